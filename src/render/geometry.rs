//! Shared geometry calculations for annotations
//!
//! This module contains constants and math shared between
//! rendering (tiny-skia) and hit-testing.

use crate::domain::Point;

/// Arrow geometry constants
pub mod arrow {
    use crate::domain::Point;

    /// Arrowhead length at zero stroke width
    pub const HEAD_BASE: f32 = 10.0;
    /// Extra arrowhead length per unit of stroke width
    pub const HEAD_PER_WIDTH: f32 = 2.0;
    /// Arrowhead half-angle from the shaft in radians (30 degrees)
    pub const HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

    /// Arrowhead length for a given stroke width
    pub fn head_length(stroke_width: f32) -> f32 {
        HEAD_BASE + stroke_width * HEAD_PER_WIDTH
    }

    /// Triangle of the arrowhead: (tip, left, right)
    ///
    /// The angle follows the shaft from `start` to `end`; a zero-length shaft
    /// points along +x.
    pub fn head_triangle(start: Point, end: Point, stroke_width: f32) -> (Point, Point, Point) {
        let angle = (end.y - start.y).atan2(end.x - start.x);
        let len = head_length(stroke_width);
        let left = Point::new(
            end.x - len * (angle - HEAD_ANGLE).cos(),
            end.y - len * (angle - HEAD_ANGLE).sin(),
        );
        let right = Point::new(
            end.x - len * (angle + HEAD_ANGLE).cos(),
            end.y - len * (angle + HEAD_ANGLE).sin(),
        );
        (end, left, right)
    }
}

/// Selection halo constants
pub mod halo {
    /// Stroke width assumed for kinds without one (highlight, blur)
    pub const DEFAULT_STROKE: f32 = 3.0;
    /// Added to the stroke width for the innermost (white) pass
    pub const MARGIN: f32 = 4.0;
    /// Extra width of the black pass over the white pass
    pub const BLACK_EXTRA: f32 = 2.0;
    /// Extra width of the red pass over the white pass
    pub const RED_EXTRA: f32 = 4.0;
    /// Padding between text and its halo rectangle
    pub const TEXT_PADDING: f32 = 5.0;
}

/// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
pub const BEZIER_K: f32 = 0.552_284_8;

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(p1: Point, p2: Point) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if p1.x < p2.x { (p1.x, p2.x) } else { (p2.x, p1.x) };
    let (min_y, max_y) = if p1.y < p2.y { (p1.y, p2.y) } else { (p2.y, p1.y) };
    (min_x, min_y, max_x, max_y)
}

/// Calculate ellipse center and radii from bounding box
#[inline]
pub fn ellipse_from_bounds(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> (f32, f32, f32, f32) {
    let cx = (min_x + max_x) * 0.5;
    let cy = (min_y + max_y) * 0.5;
    let rx = (max_x - min_x) * 0.5;
    let ry = (max_y - min_y) * 0.5;
    (cx, cy, rx, ry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_head_triangle_points_back_along_shaft() {
        let (tip, left, right) =
            arrow::head_triangle(Point::new(0.0, 0.0), Point::new(100.0, 0.0), 5.0);
        assert_eq!(tip, Point::new(100.0, 0.0));
        // Head length 20 at 30 degrees: base sits ~17.3 px behind the tip
        assert!((left.x - (100.0 - 20.0 * 0.866_025)).abs() < 1e-3);
        assert!((left.y - 10.0).abs() < 1e-3);
        assert!((right.y + 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_rect() {
        assert_eq!(
            normalize_rect(Point::new(5.0, 1.0), Point::new(2.0, 9.0)),
            (2.0, 1.0, 5.0, 9.0)
        );
    }
}
