//! Flattening the annotated page and handing it to a sink

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use tiny_skia::{FilterQuality, Pixmap, PixmapPaint, Transform};

use crate::capture::image::BaseImage;
use crate::config::SaveLocation;
use crate::render::image::{pixmap_to_rgba, rgba_to_pixmap};

/// Composite the drawing surface over the base image
///
/// The result has the base image's natural size; a surface drawn at a smaller
/// display size is scaled up to match.
pub fn flatten(base: &BaseImage, surface: &Pixmap) -> anyhow::Result<RgbaImage> {
    let mut canvas = rgba_to_pixmap(base.rgba())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate export canvas"))?;

    let sx = base.width() as f32 / surface.width() as f32;
    let sy = base.height() as f32 / surface.height() as f32;
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    canvas.draw_pixmap(0, 0, surface.as_ref(), &paint, Transform::from_scale(sx, sy), None);

    Ok(pixmap_to_rgba(&canvas))
}

/// Encode an image as an 8-bit RGBA PNG
pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

pub fn encode_png(image: &RgbaImage) -> anyhow::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(&mut buffer, image).context("Failed to encode PNG")?;
    Ok(buffer)
}

/// Where an exported image ended up
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub message: String,
}

/// Receives the flattened image
pub trait ExportSink {
    fn export(&self, image: &RgbaImage) -> anyhow::Result<ExportOutcome>;
}

/// Timestamped file name for a new export
pub fn export_file_name() -> String {
    chrono::Local::now()
        .format("Pagemark_%Y-%m-%d_%H-%M-%S.png")
        .to_string()
}

/// Writes a PNG file to a save location or an explicit path
#[derive(Debug, Clone)]
pub enum FileSink {
    Location(SaveLocation),
    Path(PathBuf),
}

impl FileSink {
    fn target(&self) -> anyhow::Result<PathBuf> {
        match self {
            FileSink::Path(path) => Ok(path.clone()),
            FileSink::Location(location) => {
                let dir = location
                    .dir()
                    .ok_or_else(|| anyhow::anyhow!("No directory for {location:?}"))?;
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
                Ok(dir.join(export_file_name()))
            }
        }
    }
}

impl ExportSink for FileSink {
    fn export(&self, image: &RgbaImage) -> anyhow::Result<ExportOutcome> {
        let path = self.target()?;
        save_png(image, &path)?;
        log::info!("Saved {}x{} image to {}", image.width(), image.height(), path.display());
        Ok(ExportOutcome {
            message: format!("Saved to {}", path.display()),
            path,
        })
    }
}

fn save_png(image: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_png(io::BufWriter::new(file), image)
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes a kept temporary PNG for an external clipboard tool to pick up
#[derive(Debug, Clone, Default)]
pub struct ClipboardFileSink {
    /// Directory for the file; the system temp dir when unset
    pub dir: Option<PathBuf>,
}

impl ExportSink for ClipboardFileSink {
    fn export(&self, image: &RgbaImage) -> anyhow::Result<ExportOutcome> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pagemark-").suffix(".png");
        let file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create clipboard file")?;

        let bytes = encode_png(image)?;
        std::fs::write(file.path(), &bytes)
            .with_context(|| format!("Failed to write {}", file.path().display()))?;
        let (_, path) = file.keep().context("Failed to keep clipboard file")?;

        log::info!("Clipboard image ready at {}", path.display());
        Ok(ExportOutcome {
            message: format!("Image ready for clipboard at {}", path.display()),
            path,
        })
    }
}
