//! Hit-testing annotations against a pointer position
//!
//! Uses the same arrowhead geometry as the renderer so that what is drawn is
//! what can be picked.

use crate::domain::{Annotation, Bounds, Point, distance_to_segment, point_in_triangle};
use crate::render::geometry::arrow;
use crate::render::text::TextMeasure;

/// Pick tolerance in surface pixels
pub const HIT_THRESHOLD: f32 = 10.0;

/// Whether `point` falls within the selectable region of an annotation
pub fn hit_test(annotation: &Annotation, point: Point, measure: &dyn TextMeasure) -> bool {
    match annotation {
        Annotation::Line(s) => distance_to_segment(point, s.p1, s.p2) < HIT_THRESHOLD,
        Annotation::Arrow(s) => {
            if distance_to_segment(point, s.p1, s.p2) < HIT_THRESHOLD {
                return true;
            }
            let (tip, left, right) = arrow::head_triangle(s.p1, s.p2, s.stroke_width);
            point_in_triangle(point, tip, left, right)
        }
        Annotation::Circle(_)
        | Annotation::Rect(_)
        | Annotation::Highlight(_)
        | Annotation::Blur(_) => annotation
            .box_bounds()
            .is_some_and(|b| b.expand(HIT_THRESHOLD).contains(point)),
        Annotation::Text(t) => {
            let width = measure.text_width(&t.content, &t.font, t.font_size);
            Bounds::from_origin_size(t.anchor, width, t.font_size).contains(point)
        }
    }
}

/// Index of the topmost annotation under `point`
///
/// Later annotations paint over earlier ones, so the search runs last to first.
pub fn find_top_shape(
    annotations: &[Annotation],
    point: Point,
    measure: &dyn TextMeasure,
) -> Option<usize> {
    annotations
        .iter()
        .rposition(|annotation| hit_test(annotation, point, measure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShapeColor;
    use crate::domain::{BlurAnnotation, HighlightAnnotation, StrokeAnnotation, TextAnnotation};
    use crate::render::text::EstimatedMeasure;

    fn stroke(p1: (f32, f32), p2: (f32, f32), width: f32) -> StrokeAnnotation {
        StrokeAnnotation {
            p1: Point::new(p1.0, p1.1),
            p2: Point::new(p2.0, p2.1),
            color: ShapeColor::RED,
            stroke_width: width,
        }
    }

    fn text(content: &str, x: f32, y: f32) -> Annotation {
        Annotation::Text(TextAnnotation {
            content: content.to_string(),
            font: "sans-serif".to_string(),
            color: ShapeColor::BLACK,
            font_size: 10.0,
            anchor: Point::new(x, y),
            editing: false,
        })
    }

    #[test]
    fn test_line_hit_within_threshold() {
        let line = Annotation::Line(stroke((0.0, 0.0), (100.0, 0.0), 3.0));
        assert!(hit_test(&line, Point::new(50.0, 5.0), &EstimatedMeasure));
        assert!(!hit_test(&line, Point::new(50.0, 20.0), &EstimatedMeasure));
        // Exactly at the threshold misses
        assert!(!hit_test(&line, Point::new(50.0, 10.0), &EstimatedMeasure));
        // Past the end the distance is to the endpoint
        assert!(!hit_test(&line, Point::new(115.0, 0.0), &EstimatedMeasure));
    }

    #[test]
    fn test_arrow_head_is_hittable() {
        // Width 20: head length 50, half-width 25 at the base
        let arrow = Annotation::Arrow(stroke((0.0, 0.0), (100.0, 0.0), 20.0));
        assert!(hit_test(&arrow, Point::new(70.0, 15.0), &EstimatedMeasure));
        let line = Annotation::Line(stroke((0.0, 0.0), (100.0, 0.0), 20.0));
        assert!(!hit_test(&line, Point::new(70.0, 15.0), &EstimatedMeasure));
    }

    #[test]
    fn test_rect_hit_uses_expanded_bounds() {
        let rect = Annotation::Rect(stroke((10.0, 10.0), (50.0, 50.0), 3.0));
        assert!(hit_test(&rect, Point::new(5.0, 5.0), &EstimatedMeasure));
        assert!(hit_test(&rect, Point::new(30.0, 30.0), &EstimatedMeasure));
        assert!(!hit_test(&rect, Point::new(-5.0, -5.0), &EstimatedMeasure));
    }

    #[test]
    fn test_box_kinds_share_expanded_bounds() {
        let (p1, p2) = (Point::new(10.0, 10.0), Point::new(50.0, 50.0));
        let shapes = [
            Annotation::Circle(stroke((10.0, 10.0), (50.0, 50.0), 3.0)),
            Annotation::Highlight(HighlightAnnotation {
                p1,
                p2,
                color: ShapeColor::YELLOW,
                opacity: 0.4,
            }),
            // Drawn from the bottom-right corner
            Annotation::Blur(BlurAnnotation {
                p1: p2,
                p2: p1,
                intensity: 5.0,
            }),
        ];
        for shape in &shapes {
            // Circles pick by box, so the corner outside the ellipse still hits
            assert!(hit_test(shape, Point::new(1.0, 1.0), &EstimatedMeasure), "{shape:?}");
            assert!(hit_test(shape, Point::new(59.0, 30.0), &EstimatedMeasure), "{shape:?}");
            assert!(!hit_test(shape, Point::new(61.0, 30.0), &EstimatedMeasure), "{shape:?}");
            assert!(!hit_test(shape, Point::new(30.0, -1.0), &EstimatedMeasure), "{shape:?}");
        }
    }

    #[test]
    fn test_text_hit_box_is_inclusive_without_padding() {
        // "abc" at size 10 is estimated 18 px wide
        let label = text("abc", 100.0, 100.0);
        assert!(hit_test(&label, Point::new(100.0, 100.0), &EstimatedMeasure));
        assert!(hit_test(&label, Point::new(118.0, 110.0), &EstimatedMeasure));
        assert!(!hit_test(&label, Point::new(99.0, 105.0), &EstimatedMeasure));
        assert!(!hit_test(&label, Point::new(110.0, 111.0), &EstimatedMeasure));
    }

    #[test]
    fn test_find_top_shape_prefers_latest() {
        let shapes = vec![
            Annotation::Rect(stroke((0.0, 0.0), (100.0, 100.0), 3.0)),
            Annotation::Rect(stroke((40.0, 40.0), (60.0, 60.0), 3.0)),
            Annotation::Line(stroke((200.0, 0.0), (300.0, 0.0), 3.0)),
        ];
        assert_eq!(find_top_shape(&shapes, Point::new(50.0, 50.0), &EstimatedMeasure), Some(1));
        assert_eq!(find_top_shape(&shapes, Point::new(5.0, 95.0), &EstimatedMeasure), Some(0));
        assert_eq!(find_top_shape(&shapes, Point::new(150.0, 150.0), &EstimatedMeasure), None);
        assert_eq!(find_top_shape(&[], Point::new(0.0, 0.0), &EstimatedMeasure), None);
    }
}
