//! Building annotations from tool parameters
//!
//! Every new annotation snapshots the tool parameters at construction time;
//! later changes to the controls only affect annotations drawn afterwards.

use serde::Deserialize;

use crate::config::{LineTool, ShapeColor, ShapeTool, ToolParameters};
use crate::domain::{
    Annotation, BlurAnnotation, HighlightAnnotation, Point, StrokeAnnotation, TextAnnotation,
    ToolMode,
};

/// Build the annotation a drag from `start` to `end` produces in `mode`
///
/// Returns `None` for modes that do not construct by dragging.
pub fn build_annotation(
    mode: ToolMode,
    start: Point,
    end: Point,
    params: &ToolParameters,
) -> Option<Annotation> {
    let annotation = match mode {
        ToolMode::DrawLine => {
            let stroke = StrokeAnnotation {
                p1: start,
                p2: end,
                color: params.line_color,
                stroke_width: params.line_width,
            };
            match params.line_tool {
                LineTool::Line => Annotation::Line(stroke),
                LineTool::Arrow => Annotation::Arrow(stroke),
            }
        }
        ToolMode::DrawShape => {
            let stroke = StrokeAnnotation {
                p1: start,
                p2: end,
                color: params.shape_color,
                stroke_width: params.shape_width,
            };
            match params.shape_tool {
                ShapeTool::Circle => Annotation::Circle(stroke),
                ShapeTool::Rect => Annotation::Rect(stroke),
            }
        }
        ToolMode::DrawHighlight => Annotation::Highlight(HighlightAnnotation {
            p1: start,
            p2: end,
            color: params.highlight_color,
            opacity: params.highlight_opacity.clamp(0.0, 1.0),
        }),
        ToolMode::DrawBlur => Annotation::Blur(BlurAnnotation {
            p1: start,
            p2: end,
            intensity: params.blur_intensity.max(0.0),
        }),
        ToolMode::Select | ToolMode::DrawText => return None,
    };
    Some(annotation)
}

/// Empty text annotation at `anchor`, ready for editing
pub fn build_text(anchor: Point, params: &ToolParameters) -> Annotation {
    Annotation::Text(TextAnnotation {
        content: String::new(),
        font: params.text_font.clone(),
        color: params.text_color,
        font_size: params.text_size,
        anchor,
        editing: false,
    })
}

/// Style change applied to the selected annotation
///
/// Fields the annotation kind does not carry are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleEdit {
    pub color: Option<ShapeColor>,
    pub stroke_width: Option<f32>,
    pub font: Option<String>,
    pub font_size: Option<f32>,
    pub opacity: Option<f32>,
    pub intensity: Option<f32>,
}

impl StyleEdit {
    /// Apply in place; returns whether any field changed
    pub fn apply(&self, annotation: &mut Annotation) -> bool {
        let mut changed = false;
        match annotation {
            Annotation::Line(s)
            | Annotation::Arrow(s)
            | Annotation::Circle(s)
            | Annotation::Rect(s) => {
                if let Some(color) = self.color {
                    changed |= s.color != color;
                    s.color = color;
                }
                if let Some(width) = self.stroke_width.filter(|w| *w > 0.0) {
                    changed |= s.stroke_width != width;
                    s.stroke_width = width;
                }
            }
            Annotation::Text(t) => {
                if let Some(color) = self.color {
                    changed |= t.color != color;
                    t.color = color;
                }
                if let Some(font) = &self.font {
                    changed |= &t.font != font;
                    t.font.clone_from(font);
                }
                if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
                    changed |= t.font_size != size;
                    t.font_size = size;
                }
            }
            Annotation::Highlight(h) => {
                if let Some(color) = self.color {
                    changed |= h.color != color;
                    h.color = color;
                }
                if let Some(opacity) = self.opacity {
                    let opacity = opacity.clamp(0.0, 1.0);
                    changed |= h.opacity != opacity;
                    h.opacity = opacity;
                }
            }
            Annotation::Blur(b) => {
                if let Some(intensity) = self.intensity {
                    let intensity = intensity.max(0.0);
                    changed |= b.intensity != intensity;
                    b.intensity = intensity;
                }
            }
        }
        changed
    }
}
