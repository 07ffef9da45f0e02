//! Geometric types and pure hit-test math
//!
//! All coordinates are drawing-surface pixels: origin top-left, y pointing down.

use serde::{Deserialize, Serialize};

/// A point on the drawing surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector from `other` to `self`
    pub fn offset_from(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    /// Translate the point by a vector
    pub fn translated(self, dx: f32, dy: f32) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Axis-aligned bounds in surface coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Bounds {
    /// Bounds spanned by two opposite corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// Bounds with a top-left origin and a size
    pub fn from_origin_size(origin: Point, width: f32, height: f32) -> Self {
        Self::from_corners(origin, origin.translated(width, height))
    }

    /// Grow the bounds by `margin` on every side
    pub fn expand(self, margin: f32) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            right: self.right + margin,
            bottom: self.bottom + margin,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Scale every edge, used to map surface bounds onto the base image
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        Self {
            left: self.left * sx,
            top: self.top * sy,
            right: self.right * sx,
            bottom: self.bottom * sy,
        }
    }
}

/// Distance from `point` to the segment `a`-`b`, with the projection clamped to the segment
pub fn distance_to_segment(point: Point, a: Point, b: Point) -> f32 {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let apx = point.x - a.x;
    let apy = point.y - a.y;
    let len_sq = abx * abx + aby * aby;

    // Degenerate segment: distance to the single point
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    };

    let dx = point.x - (a.x + abx * t);
    let dy = point.y - (a.y + aby * t);
    (dx * dx + dy * dy).sqrt()
}

/// Whether `point` lies inside (or on an edge of) the triangle `a`, `b`, `c`
pub fn point_in_triangle(point: Point, a: Point, b: Point, c: Point) -> bool {
    fn cross(p: Point, q: Point, r: Point) -> f32 {
        (q.x - p.x) * (r.y - p.y) - (r.x - p.x) * (q.y - p.y)
    }

    let d1 = cross(point, a, b);
    let d2 = cross(point, b, c);
    let d3 = cross(point, c, a);

    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
