//! Annotation rasterization using tiny-skia
//!
//! These functions draw annotations onto the drawing-surface pixmap and
//! convert between `RgbaImage` (straight alpha) and `Pixmap` (premultiplied).

use image::{Rgba, RgbaImage, imageops};
use tiny_skia::{
    ColorU8, FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, PixmapPaint, Stroke,
    Transform,
};

use super::geometry::{self, BEZIER_K, arrow, halo};
use super::text::{FontBook, TextMeasure};
use crate::capture::image::BaseImage;
#[cfg(test)]
use crate::config::ShapeColor;
use crate::domain::{Annotation, BlurAnnotation, Bounds, Point, TextAnnotation};

const HALO_RED: [u8; 4] = [255, 0, 0, 255];
const HALO_BLACK: [u8; 4] = [0, 0, 0, 255];
const HALO_WHITE: [u8; 4] = [255, 255, 255, 255];

/// Premultiply an `RgbaImage` into a new pixmap
pub fn rgba_to_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Demultiply a pixmap into a new `RgbaImage`
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Run an `image`-based drawing function over the pixmap's raw bytes and copy back
///
/// The bytes stay premultiplied; only blend opaque colors through this.
pub fn with_rgba(pixmap: &mut Pixmap, f: impl FnOnce(&mut RgbaImage)) {
    let Some(mut img) = RgbaImage::from_raw(pixmap.width(), pixmap.height(), pixmap.data().to_vec())
    else {
        return;
    };

    f(&mut img);

    // Copy back
    pixmap.data_mut().copy_from_slice(img.as_raw());
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn round_stroke(width: f32) -> Stroke {
    Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    }
}

fn build_segment_path(p1: Point, p2: Point) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(p1.x, p1.y);
    pb.line_to(p2.x, p2.y);
    pb.finish()
}

fn build_rect_path(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(p1: Point, p2: Point) -> Option<Path> {
    let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(p1, p2);
    let (cx, cy, rx, ry) = geometry::ellipse_from_bounds(min_x, min_y, max_x, max_y);
    let kx = rx * BEZIER_K;
    let ky = ry * BEZIER_K;

    let mut pb = PathBuilder::new();
    pb.move_to(cx, cy - ry);
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    pb.close();
    pb.finish()
}

fn build_arrow_head_path(p1: Point, p2: Point, stroke_width: f32) -> Option<Path> {
    let (tip, left, right) = arrow::head_triangle(p1, p2, stroke_width);
    let mut pb = PathBuilder::new();
    pb.move_to(tip.x, tip.y);
    pb.line_to(left.x, left.y);
    pb.line_to(right.x, right.y);
    pb.close();
    pb.finish()
}

/// Path traced by the selection halo (and by the stroke of outline kinds)
fn build_outline_path(annotation: &Annotation) -> Option<Path> {
    match annotation {
        Annotation::Line(s) | Annotation::Arrow(s) => build_segment_path(s.p1, s.p2),
        Annotation::Circle(s) => build_ellipse_path(s.p1, s.p2),
        Annotation::Rect(_) | Annotation::Highlight(_) | Annotation::Blur(_) => {
            let (p1, p2) = annotation.points()?;
            let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(p1, p2);
            build_rect_path(min_x, min_y, max_x, max_y)
        }
        Annotation::Text(_) => None,
    }
}

/// Draw one annotation onto the drawing surface
pub fn draw_annotation(
    pixmap: &mut Pixmap,
    annotation: &Annotation,
    fonts: &FontBook,
    base: &BaseImage,
) {
    match annotation {
        Annotation::Line(s) | Annotation::Circle(s) | Annotation::Rect(s) => {
            if let Some(path) = build_outline_path(annotation) {
                let paint = paint(s.color.to_rgba_u8());
                let stroke = round_stroke(s.stroke_width);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }
        Annotation::Arrow(s) => {
            let paint = paint(s.color.to_rgba_u8());
            if let Some(path) = build_segment_path(s.p1, s.p2) {
                let stroke = round_stroke(s.stroke_width);
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
            if let Some(head) = build_arrow_head_path(s.p1, s.p2, s.stroke_width) {
                pixmap.fill_path(&head, &paint, FillRule::Winding, Transform::identity(), None);
            }
        }
        Annotation::Text(t) => {
            // The edit overlay is authoritative while editing
            if !t.editing {
                fonts.draw_text(pixmap, t);
            }
        }
        Annotation::Highlight(h) => {
            let (min_x, min_y, max_x, max_y) = geometry::normalize_rect(h.p1, h.p2);
            if let Some(rect) = tiny_skia::Rect::from_ltrb(min_x, min_y, max_x, max_y) {
                let [r, g, b, _] = h.color.to_rgba_u8();
                let alpha = (h.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
                pixmap.fill_rect(rect, &paint([r, g, b, alpha]), Transform::identity(), None);
            }
        }
        Annotation::Blur(b) => draw_blur_region(pixmap, b, base),
    }
}

/// Re-sample the blur region from the base image and draw it blurred
///
/// The source is always the base image, never earlier annotations.
pub fn draw_blur_region(pixmap: &mut Pixmap, blur: &BlurAnnotation, base: &BaseImage) {
    let region = Bounds::from_corners(blur.p1, blur.p2);

    // Clip to the surface in whole pixels
    let clipped = Bounds {
        left: region.left.max(0.0).floor(),
        top: region.top.max(0.0).floor(),
        right: region.right.min(pixmap.width() as f32).ceil(),
        bottom: region.bottom.min(pixmap.height() as f32).ceil(),
    };
    if clipped.width() <= 0.0 || clipped.height() <= 0.0 {
        return;
    }
    let dest_w = clipped.width() as u32;
    let dest_h = clipped.height() as u32;

    let native = NativeBlur::new(clipped, blur.intensity, base);
    let source =
        imageops::crop_imm(base.rgba(), native.x, native.y, native.width, native.height).to_image();
    let blurred = if native.sigma > 0.0 {
        imageops::blur(&source, native.sigma)
    } else {
        source
    };
    let tile = if blurred.dimensions() != (dest_w, dest_h) {
        imageops::resize(&blurred, dest_w, dest_h, imageops::FilterType::Triangle)
    } else {
        blurred
    };

    let Some(tile) = rgba_to_pixmap(&tile) else {
        return;
    };
    pixmap.draw_pixmap(
        clipped.left as i32,
        clipped.top as i32,
        tile.as_ref(),
        &PixmapPaint::default(),
        Transform::identity(),
        None,
    );
}

/// A surface blur region mapped onto the base image's native pixels
#[derive(Debug, Clone, Copy, PartialEq)]
struct NativeBlur {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    sigma: f32,
}

impl NativeBlur {
    fn new(clipped: Bounds, intensity: f32, base: &BaseImage) -> Self {
        let (sx, sy) = base.scale();
        let native = clipped.scale(sx, sy);
        let x = (native.left.floor() as u32).min(base.width().saturating_sub(1));
        let y = (native.top.floor() as u32).min(base.height().saturating_sub(1));
        Self {
            x,
            y,
            width: (native.width().round() as u32).clamp(1, base.width() - x),
            height: (native.height().round() as u32).clamp(1, base.height() - y),
            sigma: intensity * sx.max(sy),
        }
    }
}

/// Draw the three-pass selection halo behind an annotation
pub fn draw_halo(pixmap: &mut Pixmap, annotation: &Annotation, measure: &dyn TextMeasure) {
    if let Annotation::Text(t) = annotation {
        draw_text_halo(pixmap, t, measure);
        return;
    }
    let Some(path) = build_outline_path(annotation) else {
        return;
    };

    let base = annotation.stroke_width().unwrap_or(halo::DEFAULT_STROKE) + halo::MARGIN;
    let passes = [
        (HALO_RED, base + halo::RED_EXTRA),
        (HALO_BLACK, base + halo::BLACK_EXTRA),
        (HALO_WHITE, base),
    ];
    for (color, width) in passes {
        pixmap.stroke_path(&path, &paint(color), &round_stroke(width), Transform::identity(), None);
    }
}

fn draw_text_halo(pixmap: &mut Pixmap, text: &TextAnnotation, measure: &dyn TextMeasure) {
    if text.content.trim().is_empty() {
        return;
    }
    let width = measure.text_width(&text.content, &text.font, text.font_size);
    let pad = halo::TEXT_PADDING;
    let left = text.anchor.x - pad;
    let top = text.anchor.y - pad;
    let right = text.anchor.x + width + pad;
    let bottom = text.anchor.y + text.font_size + pad;

    // Each pass is inset by one pixel and one pixel thinner
    let passes = [(HALO_RED, 3.0, 0.0), (HALO_BLACK, 2.0, 1.0), (HALO_WHITE, 1.0, 2.0)];
    for (color, width, inset) in passes {
        let Some(path) = build_rect_path(left + inset, top + inset, right - inset, bottom - inset)
        else {
            continue;
        };
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }
}

/// Straight-alpha color of a surface pixel
#[cfg(test)]
pub fn pixel_rgba(pixmap: &Pixmap, x: u32, y: u32) -> Option<[u8; 4]> {
    let c = pixmap.pixel(x, y)?.demultiply();
    Some([c.red(), c.green(), c.blue(), c.alpha()])
}

/// Whether a straight-alpha pixel is close to a shape color
#[cfg(test)]
pub fn matches_color(pixel: [u8; 4], color: ShapeColor, tolerance: u8) -> bool {
    let expected = color.to_rgba_u8();
    pixel
        .iter()
        .zip(expected.iter())
        .take(3)
        .all(|(a, b)| a.abs_diff(*b) <= tolerance)
}
