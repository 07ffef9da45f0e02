//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in drawing-surface pixels.

use serde::{Deserialize, Serialize};

use super::geometry::{Bounds, Point};
use crate::config::ShapeColor;

/// Stroked two-point annotation: line, arrow, ellipse or rectangle outline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeAnnotation {
    /// Start point (segment start, or first bounding-box corner)
    pub p1: Point,
    /// End point (segment end / arrow tip, or opposite corner)
    pub p2: Point,
    pub color: ShapeColor,
    pub stroke_width: f32,
}

/// Text annotation anchored at its top-left corner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextAnnotation {
    pub content: String,
    /// Font family name (e.g. "Arial", "sans-serif")
    pub font: String,
    pub color: ShapeColor,
    pub font_size: f32,
    pub anchor: Point,
    /// True while a text-edit session owns this annotation
    #[serde(default)]
    pub editing: bool,
}

/// Translucent filled rectangle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HighlightAnnotation {
    pub p1: Point,
    pub p2: Point,
    pub color: ShapeColor,
    /// Fill alpha (0.0-1.0)
    pub opacity: f32,
}

/// Region re-sampled from the base image through a blur filter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlurAnnotation {
    pub p1: Point,
    pub p2: Point,
    /// Blur radius in surface pixels
    pub intensity: f32,
}

/// Unified annotation type for ordered drawing and undo/redo
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Line(StrokeAnnotation),
    Arrow(StrokeAnnotation),
    Circle(StrokeAnnotation),
    Rect(StrokeAnnotation),
    Text(TextAnnotation),
    Highlight(HighlightAnnotation),
    Blur(BlurAnnotation),
}

impl Annotation {
    /// The two defining points, for every kind except text
    pub fn points(&self) -> Option<(Point, Point)> {
        match self {
            Annotation::Line(s)
            | Annotation::Arrow(s)
            | Annotation::Circle(s)
            | Annotation::Rect(s) => {
                Some((s.p1, s.p2))
            }
            Annotation::Highlight(h) => Some((h.p1, h.p2)),
            Annotation::Blur(b) => Some((b.p1, b.p2)),
            Annotation::Text(_) => None,
        }
    }

    /// Point a drag is anchored to: `p1`, or the text anchor
    pub fn anchor(&self) -> Point {
        match self {
            Annotation::Text(t) => t.anchor,
            _ => self.points().map(|(p1, _)| p1).unwrap_or_default(),
        }
    }

    /// Bounding box for box-like kinds (circle, rect, highlight, blur)
    pub fn box_bounds(&self) -> Option<Bounds> {
        match self {
            Annotation::Circle(_)
            | Annotation::Rect(_)
            | Annotation::Highlight(_)
            | Annotation::Blur(_) => {
                self.points().map(|(p1, p2)| Bounds::from_corners(p1, p2))
            }
            _ => None,
        }
    }

    /// Move every point of the annotation by a vector
    pub fn translate(&mut self, dx: f32, dy: f32) {
        match self {
            Annotation::Line(s)
            | Annotation::Arrow(s)
            | Annotation::Circle(s)
            | Annotation::Rect(s) => {
                s.p1 = s.p1.translated(dx, dy);
                s.p2 = s.p2.translated(dx, dy);
            }
            Annotation::Highlight(h) => {
                h.p1 = h.p1.translated(dx, dy);
                h.p2 = h.p2.translated(dx, dy);
            }
            Annotation::Blur(b) => {
                b.p1 = b.p1.translated(dx, dy);
                b.p2 = b.p2.translated(dx, dy);
            }
            Annotation::Text(t) => t.anchor = t.anchor.translated(dx, dy),
        }
    }

    /// Stroke width used for rendering and the selection halo
    pub fn stroke_width(&self) -> Option<f32> {
        match self {
            Annotation::Line(s)
            | Annotation::Arrow(s)
            | Annotation::Circle(s)
            | Annotation::Rect(s) => {
                Some(s.stroke_width)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextAnnotation> {
        match self {
            Annotation::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextAnnotation> {
        match self {
            Annotation::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Short kind name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Annotation::Line(_) => "line",
            Annotation::Arrow(_) => "arrow",
            Annotation::Circle(_) => "circle",
            Annotation::Rect(_) => "rect",
            Annotation::Text(_) => "text",
            Annotation::Highlight(_) => "highlight",
            Annotation::Blur(_) => "blur",
        }
    }
}
