//! Segment extension to the viewport boundary.
//!
//! A verified segment usually covers only part of the real edge; for display
//! the guide is drawn across the whole capture region. The extension picks
//! the two boundary intersections that best represent the full visible
//! extent of the line. Total: always returns two points, falling back to the
//! original endpoints when the intersection set degenerates.
use crate::types::{Point, Segment, Viewport};

/// Extend `segment` to the bounds of `viewport`.
///
/// Vertical and horizontal lines intersect the obvious boundary pair. The
/// general case intersects the infinite line with all four boundary edges,
/// keeps intersections whose other coordinate is inside the viewport
/// (inclusive), de-duplicates exactly, and — when a corner produces more
/// than two hits — picks the two farthest from the segment midpoint.
pub fn extend_to_viewport(segment: &Segment, viewport: Viewport) -> (Point, Point) {
    let [x1, y1] = segment.p0;
    let [x2, y2] = segment.p1;
    let w = viewport.width;
    let h = viewport.height;

    let mut hits: Vec<Point> = Vec::with_capacity(4);
    if x1 == x2 {
        hits.push([x1, 0]);
        hits.push([x1, h]);
    } else if y1 == y2 {
        hits.push([0, y1]);
        hits.push([w, y1]);
    } else {
        // y1 != y2 here, so the slope is never zero.
        let m = (y2 - y1) as f32 / (x2 - x1) as f32;
        let c = y1 as f32 - m * x1 as f32;

        let y_at_x0 = c;
        if (0.0..=h as f32).contains(&y_at_x0) {
            hits.push([0, y_at_x0.round() as i32]);
        }
        let y_at_xw = m * w as f32 + c;
        if (0.0..=h as f32).contains(&y_at_xw) {
            hits.push([w, y_at_xw.round() as i32]);
        }
        let x_at_y0 = -c / m;
        if (0.0..=w as f32).contains(&x_at_y0) {
            hits.push([x_at_y0.round() as i32, 0]);
        }
        let x_at_yh = (h as f32 - c) / m;
        if (0.0..=w as f32).contains(&x_at_yh) {
            hits.push([x_at_yh.round() as i32, h]);
        }
    }

    // Exact de-duplication; rounding can land two boundary hits on a corner.
    let mut unique: Vec<Point> = Vec::with_capacity(hits.len());
    for p in hits {
        if !unique.contains(&p) {
            unique.push(p);
        }
    }

    match unique.len() {
        2 => (unique[0], unique[1]),
        n if n > 2 => {
            let mid = segment.midpoint();
            unique.sort_by(|a, b| {
                let da = dist_sq(*a, mid);
                let db = dist_sq(*b, mid);
                db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
            });
            (unique[0], unique[1])
        }
        _ => (segment.p0, segment.p1),
    }
}

#[inline]
fn dist_sq(p: Point, mid: nalgebra::Vector2<f32>) -> f32 {
    let dx = p[0] as f32 - mid.x;
    let dy = p[1] as f32 - mid.y;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unordered_eq(got: (Point, Point), a: Point, b: Point) -> bool {
        got == (a, b) || got == (b, a)
    }

    #[test]
    fn horizontal_line_spans_left_to_right() {
        let seg = Segment::new(20, 50, 60, 50);
        let ends = extend_to_viewport(&seg, Viewport::new(100, 200));
        assert!(unordered_eq(ends, [0, 50], [100, 50]), "{ends:?}");
    }

    #[test]
    fn vertical_line_spans_top_to_bottom() {
        let seg = Segment::new(30, 10, 30, 40);
        let ends = extend_to_viewport(&seg, Viewport::new(100, 200));
        assert!(unordered_eq(ends, [30, 0], [30, 200]), "{ends:?}");
    }

    #[test]
    fn interior_segment_extends_onto_the_boundary() {
        let seg = Segment::new(10, 20, 40, 80);
        let viewport = Viewport::new(100, 100);
        let (a, b) = extend_to_viewport(&seg, viewport);
        for p in [a, b] {
            let on_boundary =
                p[0] == 0 || p[0] == viewport.width || p[1] == 0 || p[1] == viewport.height;
            assert!(on_boundary, "{p:?} not on boundary");
        }
        assert_ne!(a, b);
    }

    #[test]
    fn corner_diagonal_prefers_the_longest_span() {
        // The main diagonal of a square hits both corners; all four boundary
        // intersections coincide pairwise after rounding, leaving exactly
        // the two corner points.
        let seg = Segment::new(40, 40, 60, 60);
        let ends = extend_to_viewport(&seg, Viewport::new(100, 100));
        assert!(unordered_eq(ends, [0, 0], [100, 100]), "{ends:?}");
    }

    #[test]
    fn steep_line_misses_the_side_edges() {
        // Nearly vertical: only the top and bottom edges are hit.
        let seg = Segment::new(50, 10, 51, 90);
        let viewport = Viewport::new(100, 100);
        let (a, b) = extend_to_viewport(&seg, viewport);
        assert!(a[1] == 0 || a[1] == 100, "{a:?}");
        assert!(b[1] == 0 || b[1] == 100, "{b:?}");
        assert_ne!(a[1], b[1]);
    }

    #[test]
    fn line_outside_bounds_falls_back_to_original_endpoints() {
        // A diagonal far outside a tiny viewport produces no valid hits.
        let seg = Segment::new(500, 900, 600, 1000);
        let ends = extend_to_viewport(&seg, Viewport::new(10, 10));
        assert_eq!(ends, ([500, 900], [600, 1000]));
    }
}
