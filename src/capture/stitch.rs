//! Assembling viewport captures into one page image

use image::RgbaImage;
use image::imageops::{self, FilterType};

/// A viewport capture taken at a scroll offset, in CSS pixels
#[derive(Clone, Debug)]
pub struct GridTile {
    pub image: RgbaImage,
    pub scroll_x: u32,
    pub scroll_y: u32,
}

/// Page and viewport dimensions in CSS pixels, plus the device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageLayout {
    pub page_width: u32,
    pub page_height: u32,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub pixel_ratio: f32,
}

/// Stack slices top to bottom
///
/// The canvas is as wide as the first slice. With `total_height` set the
/// canvas has that height and the last slice is cropped to what remains;
/// otherwise the canvas is the sum of the slice heights.
pub fn stitch_vertical(
    slices: &[RgbaImage],
    total_height: Option<u32>,
) -> anyhow::Result<RgbaImage> {
    let first = slices
        .first()
        .ok_or_else(|| anyhow::anyhow!("No slices to stitch"))?;
    let width = first.width();
    let height = total_height.unwrap_or_else(|| slices.iter().map(|s| s.height()).sum());
    if width == 0 || height == 0 {
        anyhow::bail!("Cannot stitch a {width}x{height} page");
    }

    let mut page = RgbaImage::new(width, height);
    let mut offset = 0u32;
    for slice in slices {
        let remaining = height - offset;
        if remaining == 0 {
            break;
        }
        let slice_height = slice.height().min(remaining);
        let visible =
            imageops::crop_imm(slice, 0, 0, slice.width().min(width), slice_height).to_image();
        imageops::overlay(&mut page, &visible, 0, i64::from(offset));
        offset += slice_height;
    }
    log::debug!("Stitched {} slices into {width}x{height}", slices.len());
    Ok(page)
}

/// Draw tiles at their scroll offsets onto a page-sized canvas
///
/// Each tile fills the viewport-sized area at its offset, clipped to the page,
/// and the whole canvas is scaled by the pixel ratio.
pub fn stitch_grid(tiles: &[GridTile], layout: PageLayout) -> anyhow::Result<RgbaImage> {
    if tiles.is_empty() {
        anyhow::bail!("No tiles to stitch");
    }
    let ratio = if layout.pixel_ratio > 0.0 { layout.pixel_ratio } else { 1.0 };
    let scaled = |v: u32| (v as f32 * ratio).round() as u32;

    let width = scaled(layout.page_width);
    let height = scaled(layout.page_height);
    if width == 0 || height == 0 {
        anyhow::bail!("Cannot stitch a {width}x{height} page");
    }

    let mut page = RgbaImage::new(width, height);
    for tile in tiles {
        if tile.scroll_x >= layout.page_width || tile.scroll_y >= layout.page_height {
            log::warn!("Skipping tile at {}x{} outside the page", tile.scroll_x, tile.scroll_y);
            continue;
        }
        let dest_w = scaled(layout.viewport_width.min(layout.page_width - tile.scroll_x));
        let dest_h = scaled(layout.viewport_height.min(layout.page_height - tile.scroll_y));
        if dest_w == 0 || dest_h == 0 {
            continue;
        }
        let resized;
        let image = if tile.image.dimensions() != (dest_w, dest_h) {
            resized = imageops::resize(&tile.image, dest_w, dest_h, FilterType::Triangle);
            &resized
        } else {
            &tile.image
        };
        imageops::overlay(
            &mut page,
            image,
            i64::from(scaled(tile.scroll_x)),
            i64::from(scaled(tile.scroll_y)),
        );
    }
    log::debug!("Stitched {} tiles into {width}x{height}", tiles.len());
    Ok(page)
}
