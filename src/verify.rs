//! Statistical verification of Hough candidates against the edge point cloud.
//!
//! A candidate earns support from every edge point within [`INLIER_TOL`] of
//! the *segment* (projection parameter clamped to [0, 1], so points beyond
//! the endpoints are measured against the nearest endpoint, not the infinite
//! line). Only candidates whose support strictly exceeds the configured
//! minimum survive, and of those only the three best.
use crate::types::{Point, Segment};
use nalgebra::Vector2;

/// Perpendicular distance below which an edge point supports a segment.
pub const INLIER_TOL: f32 = 1.5;

/// Hard cap on verified lines per frame.
const MAX_VERIFIED: usize = 3;

struct ScoredLine {
    segment: Segment,
    inliers: usize,
}

/// Count edge points within [`INLIER_TOL`] of the segment.
pub fn count_inliers(segment: &Segment, points: &[Point]) -> usize {
    let p0 = segment.p0f();
    let dir = segment.p1f() - p0;
    let len_sq = dir.norm_squared();
    debug_assert!(len_sq > 0.0, "degenerate segment");

    points
        .iter()
        .filter(|&&[x, y]| {
            let p = Vector2::new(x as f32, y as f32);
            let t = ((p - p0).dot(&dir) / len_sq).clamp(0.0, 1.0);
            let proj = p0 + dir * t;
            (p - proj).norm() < INLIER_TOL
        })
        .count()
}

/// Keep the candidates best supported by the point cloud.
///
/// Returns at most three segments, ordered by descending inlier count; ties
/// keep input order (stable sort). Degenerate candidates are skipped, and an
/// empty candidate list or point cloud yields an empty result.
pub fn verify_lines(candidates: &[Segment], points: &[Point], min_inliers: usize) -> Vec<Segment> {
    if candidates.is_empty() || points.is_empty() {
        return Vec::new();
    }

    let mut supported: Vec<ScoredLine> = Vec::new();
    for segment in candidates {
        if segment.is_degenerate() {
            continue;
        }
        let inliers = count_inliers(segment, points);
        if inliers > min_inliers {
            supported.push(ScoredLine {
                segment: *segment,
                inliers,
            });
        }
    }

    supported.sort_by(|a, b| b.inliers.cmp(&a.inliers));
    supported.truncate(MAX_VERIFIED);
    supported.into_iter().map(|s| s.segment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points_on_row(y: i32, xs: impl Iterator<Item = i32>) -> Vec<Point> {
        xs.map(|x| [x, y]).collect()
    }

    #[test]
    fn perfect_line_scenario() {
        // 50 points exactly on y=0 across the segment (0,0)-(99,0).
        let points = points_on_row(0, (0..100).step_by(2));
        let candidate = Segment::new(0, 0, 99, 0);
        assert_eq!(count_inliers(&candidate, &points), 50);
        let verified = verify_lines(&[candidate], &points, 20);
        assert_eq!(verified, vec![candidate]);
    }

    #[test]
    fn raising_min_inliers_removes_the_line() {
        let points = points_on_row(0, (0..100).step_by(2));
        let candidate = Segment::new(0, 0, 99, 0);
        assert!(verify_lines(&[candidate], &points, 50).is_empty());
        assert_eq!(verify_lines(&[candidate], &points, 49).len(), 1);
    }

    #[test]
    fn support_is_measured_against_the_segment_not_the_infinite_line() {
        // Points far beyond the right endpoint are off-segment even though
        // they sit exactly on the infinite line.
        let points = points_on_row(0, 50..70);
        let candidate = Segment::new(0, 0, 10, 0);
        assert_eq!(count_inliers(&candidate, &points), 0);
    }

    #[test]
    fn tolerance_boundary_is_exclusive() {
        let candidate = Segment::new(0, 0, 10, 0);
        assert_eq!(count_inliers(&candidate, &[[5, 1]]), 1); // dist 1.0
        assert_eq!(count_inliers(&candidate, &[[5, 2]]), 0); // dist 2.0
    }

    #[test]
    fn output_is_ordered_by_support_and_capped_at_three() {
        let mut points = points_on_row(0, 0..60); // 60 supporters
        points.extend(points_on_row(10, 0..40)); // 40
        points.extend(points_on_row(20, 0..30)); // 30
        points.extend(points_on_row(30, 0..25)); // 25
        let candidates = [
            Segment::new(0, 30, 99, 30),
            Segment::new(0, 10, 99, 10),
            Segment::new(0, 0, 99, 0),
            Segment::new(0, 20, 99, 20),
        ];
        let verified = verify_lines(&candidates, &points, 5);
        assert_eq!(
            verified,
            vec![
                Segment::new(0, 0, 99, 0),
                Segment::new(0, 10, 99, 10),
                Segment::new(0, 20, 99, 20),
            ]
        );
    }

    #[test]
    fn degenerate_candidates_are_skipped() {
        let points = points_on_row(0, 0..50);
        let verified = verify_lines(&[Segment::new(5, 0, 5, 0)], &points, 1);
        assert!(verified.is_empty());
    }

    #[test]
    fn empty_inputs_yield_empty_results() {
        let candidate = Segment::new(0, 0, 10, 0);
        assert!(verify_lines(&[], &[[1, 1]], 0).is_empty());
        assert!(verify_lines(&[candidate], &[], 0).is_empty());
    }
}
