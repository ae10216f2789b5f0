//! Feature extraction: from a raw RGB frame to edge evidence and candidates.
//!
//! One call per tick produces everything the verifier needs:
//!
//! - the edge point cloud (all foreground pixels of the binary edge map),
//! - straight-segment candidates proposed by the probabilistic Hough pass.
//!
//! Stages: grayscale conversion → bilateral smoothing → dual-threshold edge
//! detection → point-cloud extraction → Hough proposals. Pure function of
//! `(frame, params)`; parameters are clamped, never rejected.
pub mod bilateral;
pub mod canny;
pub mod hough;

pub use bilateral::bilateral_filter;
pub use canny::{detect_edges, EdgeMap};
pub use hough::{hough_lines_p, HoughParams};

use crate::image::{rgb_to_luma, RgbImageU8};
use crate::params::Params;
use crate::types::{Point, Segment};
use std::collections::HashSet;

/// Candidate segments plus the edge point cloud of one frame.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    pub candidates: Vec<Segment>,
    /// Never absent: empty when the frame has no edges.
    pub points: Vec<Point>,
}

fn edge_map(frame: &RgbImageU8, p: &Params) -> EdgeMap {
    let gray = rgb_to_luma(frame);
    let smoothed = bilateral_filter(
        &gray,
        p.bilateral_d,
        p.bilateral_sigma_color,
        p.bilateral_sigma_space,
    );
    detect_edges(&smoothed, p.canny_threshold1, p.canny_threshold2)
}

/// Single-pass extraction with one Hough parameter set.
pub fn extract(frame: &RgbImageU8, params: &Params) -> FeatureSet {
    let p = params.sanitized();
    let edges = edge_map(frame, &p);
    let points = edges.points();
    let candidates = hough_lines_p(
        &edges,
        &HoughParams {
            threshold: p.hough_threshold,
            min_line_length: p.hough_min_line_length,
            max_line_gap: p.hough_max_line_gap,
        },
    );
    FeatureSet { candidates, points }
}

/// Dual-resolution extraction: two Hough passes over the same edge map, one
/// tuned for long confident segments and one for short fragments.
///
/// Results are merged with exact-coordinate de-duplication, preserving
/// first-seen order; the long set takes priority.
pub fn extract_dual(frame: &RgbImageU8, params: &Params) -> FeatureSet {
    let p = params.sanitized();
    let edges = edge_map(frame, &p);
    let points = edges.points();

    let long = hough_lines_p(
        &edges,
        &HoughParams {
            threshold: p.hough_threshold_long,
            min_line_length: p.hough_min_line_length_long,
            max_line_gap: p.hough_max_line_gap_long,
        },
    );
    let short = hough_lines_p(
        &edges,
        &HoughParams {
            threshold: p.hough_threshold_short,
            min_line_length: p.hough_min_line_length_short,
            max_line_gap: p.hough_max_line_gap_short,
        },
    );

    let mut seen: HashSet<Segment> = HashSet::with_capacity(long.len() + short.len());
    let mut candidates = Vec::with_capacity(long.len() + short.len());
    for seg in long.into_iter().chain(short) {
        if seen.insert(seg) {
            candidates.push(seg);
        }
    }
    FeatureSet { candidates, points }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RgbFrame;

    fn frame_with_vertical_edge(w: usize, h: usize, edge_x: usize) -> RgbFrame {
        let mut data = vec![0u8; w * h * 3];
        for y in 0..h {
            for x in 0..w {
                let v = if x < edge_x { 30 } else { 220 };
                let i = (y * w + x) * 3;
                data[i] = v;
                data[i + 1] = v;
                data[i + 2] = v;
            }
        }
        RgbFrame::new(w, h, data)
    }

    fn test_params() -> Params {
        Params {
            bilateral_d: 5,
            bilateral_sigma_color: 30.0,
            bilateral_sigma_space: 2.0,
            canny_threshold1: 100.0,
            canny_threshold2: 250.0,
            hough_threshold: 20,
            hough_min_line_length: 20,
            hough_max_line_gap: 2,
            hough_threshold_long: 20,
            hough_min_line_length_long: 20,
            hough_max_line_gap_long: 2,
            hough_threshold_short: 10,
            hough_min_line_length_short: 5,
            hough_max_line_gap_short: 2,
            ..Params::default()
        }
    }

    #[test]
    fn step_edge_produces_candidates_and_points() {
        let frame = frame_with_vertical_edge(64, 64, 32);
        let features = extract(&frame.as_view(), &test_params());
        assert!(!features.points.is_empty());
        assert!(!features.candidates.is_empty());
        let seg = &features.candidates[0];
        assert_eq!(seg.p0[0], seg.p1[0], "expected a vertical candidate");
        assert!((seg.p0[0] - 32).abs() <= 2);
    }

    #[test]
    fn blank_frame_produces_empty_but_present_outputs() {
        let frame = RgbFrame::new(32, 32, vec![128u8; 32 * 32 * 3]);
        let features = extract_dual(&frame.as_view(), &test_params());
        assert!(features.points.is_empty());
        assert!(features.candidates.is_empty());
    }

    #[test]
    fn dual_mode_deduplicates_exact_matches() {
        // Long and short passes configured identically: every short-set
        // segment is an exact duplicate and must be dropped.
        let frame = frame_with_vertical_edge(64, 64, 32);
        let mut params = test_params();
        params.hough_threshold_short = params.hough_threshold_long;
        params.hough_min_line_length_short = params.hough_min_line_length_long;
        params.hough_max_line_gap_short = params.hough_max_line_gap_long;

        let single = extract(&frame.as_view(), &params);
        let dual = extract_dual(&frame.as_view(), &params);
        assert_eq!(dual.candidates.len(), single.candidates.len());
    }
}
