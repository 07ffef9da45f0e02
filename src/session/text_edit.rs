//! Text-edit overlay
//!
//! The editor computes where the edit field goes and what it looks like; the
//! UI layer supplies the field itself through [`TextEditAdapter`].

use crate::config::ShapeColor;
use crate::domain::TextAnnotation;
use crate::render::text::TextMeasure;

/// Narrowest the edit field gets, in surface pixels
pub const MIN_OVERLAY_WIDTH: f32 = 20.0;
/// Room left after the measured text
pub const OVERLAY_SLACK: f32 = 10.0;

/// The text annotation under edit and the live contents of the field
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    pub index: usize,
    pub buffer: String,
}

/// Placement and style of the edit field, in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub font: String,
    pub font_size: f32,
    pub color: ShapeColor,
}

impl OverlayLayout {
    /// Layout for editing `text` with `buffer` as the field's contents
    pub fn for_text(text: &TextAnnotation, buffer: &str, measure: &dyn TextMeasure) -> Self {
        Self {
            x: text.anchor.x,
            y: text.anchor.y,
            width: overlay_width(buffer, &text.font, text.font_size, measure),
            font: text.font.clone(),
            font_size: text.font_size,
            color: text.color,
        }
    }
}

/// Field width for the given contents
pub fn overlay_width(buffer: &str, font: &str, font_size: f32, measure: &dyn TextMeasure) -> f32 {
    let measured = measure.text_width(buffer, font, font_size);
    MIN_OVERLAY_WIDTH.max(measured + OVERLAY_SLACK)
}

/// Edit field supplied by the UI layer
///
/// At most one field is open at a time; `open` is only called when none is.
pub trait TextEditAdapter {
    /// Show a focused field with `initial` as its contents
    fn open(&mut self, layout: &OverlayLayout, initial: &str);
    /// The contents changed and the field should be resized
    fn resize(&mut self, width: f32);
    /// Remove the field
    fn close(&mut self);
    fn is_open(&self) -> bool;
}

/// Overlay without a visible field, for scripted sessions and tests
#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    layout: Option<OverlayLayout>,
}

impl HeadlessOverlay {
    /// Layout of the open field
    pub fn layout(&self) -> Option<&OverlayLayout> {
        self.layout.as_ref()
    }
}

impl TextEditAdapter for HeadlessOverlay {
    fn open(&mut self, layout: &OverlayLayout, initial: &str) {
        log::debug!("Text overlay opened at {}x{} with {initial:?}", layout.x, layout.y);
        self.layout = Some(layout.clone());
    }

    fn resize(&mut self, width: f32) {
        if let Some(layout) = self.layout.as_mut() {
            layout.width = width;
        }
    }

    fn close(&mut self) {
        self.layout = None;
    }

    fn is_open(&self) -> bool {
        self.layout.is_some()
    }
}
