//! Annotation rendering module
//!
//! This module contains:
//! - Geometry calculations shared between rendering and hit-testing
//! - Rasterization of annotations onto the drawing surface using tiny-skia
//! - Font lookup and text measurement

pub mod geometry;
pub mod image;
pub mod text;

use tiny_skia::{Color, Pixmap};

use crate::capture::image::BaseImage;
use crate::domain::Annotation;
use text::FontBook;

/// Paints the document onto the drawing surface
pub struct Renderer {
    fonts: FontBook,
}

impl Renderer {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    /// Fonts double as the text measurer for hit-testing
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Clear the surface and paint every annotation in document order
    ///
    /// The selected annotation gets its halo painted right before itself, so
    /// later annotations still paint over it. The preview is painted last and
    /// never belongs to the document.
    pub fn redraw_all(
        &self,
        surface: &mut Pixmap,
        annotations: &[Annotation],
        selected: Option<usize>,
        preview: Option<&Annotation>,
        base: &BaseImage,
    ) {
        surface.fill(Color::TRANSPARENT);

        for (index, annotation) in annotations.iter().enumerate() {
            if selected == Some(index) {
                image::draw_halo(surface, annotation, &self.fonts);
            }
            image::draw_annotation(surface, annotation, &self.fonts, base);
        }

        if let Some(preview) = preview {
            image::draw_annotation(surface, preview, &self.fonts, base);
        }
    }
}
