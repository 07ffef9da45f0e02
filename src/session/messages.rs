//! Message types for the editor session
//!
//! This module contains:
//! - EditorMsg, the input events the editor processes in order
//! - Key and Modifiers, a toolkit-neutral keyboard event
//!
//! Messages deserialize from JSON so input can be replayed from a script.

use serde::Deserialize;

use crate::annotations::handlers::StyleEdit;
use crate::domain::ToolMode;

// ============================================================================
// Keyboard Types
// ============================================================================

/// Named keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Named {
    Delete,
    Backspace,
    Enter,
    Escape,
}

/// A key press
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Named(Named),
    Character(String),
}

/// Modifier state at the time of a key press
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS
    pub meta: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Ctrl or Cmd, whichever the platform uses for shortcuts
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }

    pub fn shift(self) -> bool {
        self.shift
    }
}

// ============================================================================
// Editor Messages
// ============================================================================

/// Input events for the editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditorMsg {
    /// Toolbar button for a mode
    ActivateTool { mode: ToolMode },
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    DoubleClick { x: f32, y: f32 },
    /// Raw key press, translated by the shortcut table
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// New content of the text-edit field
    TextInput { text: String },
    /// Finalize the text edit (Enter or focus loss)
    TextCommit,
    /// Abandon the text edit (Escape)
    TextCancel,
    Undo,
    Redo,
    DeleteSelected,
    /// Change style of the selected annotation
    Restyle { edit: StyleEdit },
}

impl EditorMsg {
    pub fn tool(mode: ToolMode) -> Self {
        Self::ActivateTool { mode }
    }

    pub fn down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn drag_to(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    pub fn up(x: f32, y: f32) -> Self {
        Self::PointerUp { x, y }
    }

    pub fn input(text: impl Into<String>) -> Self {
        Self::TextInput { text: text.into() }
    }

    pub fn named_key(key: Named) -> Self {
        Self::Key {
            key: Key::Named(key),
            modifiers: Modifiers::default(),
        }
    }

    pub fn shortcut(c: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: Key::Character(c.to_string()),
            modifiers,
        }
    }
}
