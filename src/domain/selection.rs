//! Tool modes and transient pointer sessions

use serde::{Deserialize, Serialize};

use super::geometry::Point;

/// Active interaction behavior of the editor
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolMode {
    #[default]
    Select,
    /// Line or arrow, per the line tool parameter
    DrawLine,
    /// Circle or rectangle, per the shape tool parameter
    DrawShape,
    DrawText,
    DrawHighlight,
    DrawBlur,
}

impl ToolMode {
    /// Modes that build an annotation from a pointer drag
    pub fn is_drag_construction(self) -> bool {
        matches!(
            self,
            ToolMode::DrawLine | ToolMode::DrawShape | ToolMode::DrawHighlight | ToolMode::DrawBlur
        )
    }

    /// Cursor the UI should show over the canvas
    pub fn cursor(self) -> Cursor {
        match self {
            ToolMode::Select => Cursor::Pointer,
            ToolMode::DrawText => Cursor::Text,
            _ => Cursor::Crosshair,
        }
    }
}

/// Cursor hint for the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Pointer,
    Crosshair,
    Text,
}

/// Moving an existing annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Index of the dragged annotation in the document
    pub index: usize,
    /// Pointer position relative to the annotation anchor at grab time
    pub offset: Point,
}

/// Drawing a new annotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Construction {
    pub start: Point,
    pub current: Point,
}

/// Pointer gesture between pointer-down and pointer-up
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging(DragSession),
    Constructing(Construction),
}
