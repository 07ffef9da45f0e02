//! Base image type for the page being annotated

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

/// The captured page image with its natural and display sizes
///
/// The drawing surface is sized to the display size; the natural size is the
/// resolution the page was captured at and the resolution of the export.
#[derive(Clone, Debug)]
pub struct BaseImage {
    rgba: RgbaImage,
    display_width: u32,
    display_height: u32,
}

impl BaseImage {
    /// Base image displayed at its natural size
    pub fn new(rgba: RgbaImage) -> Self {
        let (display_width, display_height) = rgba.dimensions();
        log::debug!("BaseImage loaded: {display_width}x{display_height} pixels");
        Self {
            rgba,
            display_width,
            display_height,
        }
    }

    /// Decode an image file from disk
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let img = image::open(path)
            .with_context(|| format!("Failed to open base image {}", path.display()))?
            .to_rgba8();
        if img.width() == 0 || img.height() == 0 {
            anyhow::bail!("Base image {} is empty", path.display());
        }
        Ok(Self::new(img))
    }

    /// Set the size the surface is drawn at; zero dimensions keep the natural size
    pub fn with_display_size(mut self, width: u32, height: u32) -> Self {
        if width > 0 && height > 0 {
            self.display_width = width;
            self.display_height = height;
        }
        self
    }

    /// Natural width
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Natural height
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn display_size(&self) -> (u32, u32) {
        (self.display_width, self.display_height)
    }

    /// Natural pixels per display pixel, per axis
    pub fn scale(&self) -> (f32, f32) {
        (
            self.width() as f32 / self.display_width as f32,
            self.height() as f32 / self.display_height as f32,
        )
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }
}
