//! Per-tick orchestration: features → verification → tracking → extension.
//!
//! [`GuideDetector`] is the single owner of cross-frame state (the line
//! tracker). One call to [`process`] runs the whole pipeline on one frame;
//! [`process_missed`] covers skipped ticks (capture failure) by fading the
//! tracker as if zero lines were detected, so the displayed guides stay
//! temporally continuous.
//!
//! [`process`]: GuideDetector::process
//! [`process_missed`]: GuideDetector::process_missed
use crate::extend::extend_to_viewport;
use crate::features::{extract, extract_dual};
use crate::image::RgbImageU8;
use crate::params::Params;
use crate::tracker::{LineTracker, TrackerOptions};
use crate::types::{Point, Segment, Viewport};
use crate::verify::verify_lines;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// One displayable guide line.
///
/// `endpoints` is what the renderer draws: the viewport-extended span while
/// the line is freshly detected (confidence at the default), the raw
/// detected segment once it is fading — the visual cue that a guide has gone
/// stale.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideLine {
    pub segment: Segment,
    pub confidence: i32,
    pub endpoints: (Point, Point),
    pub extended: bool,
}

/// Result of one tick, with stage timings for tooling.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameReport {
    pub guides: Vec<GuideLine>,
    pub candidate_count: usize,
    pub point_count: usize,
    pub verified_count: usize,
    pub features_ms: f64,
    pub verify_ms: f64,
    pub latency_ms: f64,
    /// True when this tick had no frame and only the fade was applied.
    pub skipped: bool,
}

/// Stateful per-tick pipeline driver.
pub struct GuideDetector {
    tracker: LineTracker,
    dual_hough: bool,
    default_confidence: i32,
}

impl GuideDetector {
    /// `dual_hough` selects the two-pass (long + short) candidate extraction.
    pub fn new(tracker_options: TrackerOptions, dual_hough: bool) -> Self {
        let default_confidence = tracker_options.default_confidence;
        Self {
            tracker: LineTracker::new(tracker_options),
            dual_hough,
            default_confidence,
        }
    }

    /// Run one full tick on a captured frame.
    pub fn process(
        &mut self,
        frame: &RgbImageU8,
        params: &Params,
        viewport: Viewport,
    ) -> FrameReport {
        let total_start = Instant::now();

        let features_start = Instant::now();
        let features = if self.dual_hough {
            extract_dual(frame, params)
        } else {
            extract(frame, params)
        };
        let features_ms = features_start.elapsed().as_secs_f64() * 1000.0;

        let verify_start = Instant::now();
        let min_inliers = params.sanitized().min_inliers.max(0) as usize;
        let verified = verify_lines(&features.candidates, &features.points, min_inliers);
        let verify_ms = verify_start.elapsed().as_secs_f64() * 1000.0;

        self.tracker.update(&verified);
        let guides = self.collect_guides(Some(viewport));

        let latency_ms = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "GuideDetector::process w={} h={} candidates={} points={} verified={} guides={} latency_ms={:.3}",
            frame.w,
            frame.h,
            features.candidates.len(),
            features.points.len(),
            verified.len(),
            guides.len(),
            latency_ms
        );

        FrameReport {
            guides,
            candidate_count: features.candidates.len(),
            point_count: features.points.len(),
            verified_count: verified.len(),
            features_ms,
            verify_ms,
            latency_ms,
            skipped: false,
        }
    }

    /// Apply the fade-only update for a tick whose frame never arrived.
    ///
    /// Surviving lines are still reported (with raw endpoints) so the
    /// overlay keeps showing fading guides across a capture hiccup.
    pub fn process_missed(&mut self) -> FrameReport {
        let start = Instant::now();
        self.tracker.update(&[]);
        let guides = self.collect_guides(None);
        debug!("GuideDetector::process_missed guides={}", guides.len());
        FrameReport {
            guides,
            skipped: true,
            latency_ms: start.elapsed().as_secs_f64() * 1000.0,
            ..FrameReport::default()
        }
    }

    fn collect_guides(&self, viewport: Option<Viewport>) -> Vec<GuideLine> {
        self.tracker
            .stable_lines()
            .into_iter()
            .map(|(segment, confidence)| {
                let extended = confidence >= self.default_confidence;
                let endpoints = match (extended, viewport) {
                    (true, Some(vp)) => extend_to_viewport(&segment, vp),
                    _ => (segment.p0, segment.p1),
                };
                GuideLine {
                    segment,
                    confidence,
                    endpoints,
                    extended: extended && viewport.is_some(),
                }
            })
            .collect()
    }
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
            hough_threshold_long: 20,
            hough_min_line_length_long: 20,
            hough_max_line_gap_long: 2,
            hough_threshold_short: 10,
            hough_min_line_length_short: 5,
            hough_max_line_gap_short: 2,
            min_inliers: 20,
            ..Params::default()
        }
    }

    #[test]
    fn fresh_detection_is_extended_to_the_viewport() {
        let frame = frame_with_vertical_edge(64, 64, 32);
        let viewport = Viewport::new(64, 64);
        let mut detector = GuideDetector::new(TrackerOptions::default(), true);
        let report = detector.process(&frame.as_view(), &test_params(), viewport);

        assert!(!report.guides.is_empty());
        assert!(report.guides.len() <= 3);
        let guide = &report.guides[0];
        assert!(guide.extended);
        assert_eq!(guide.confidence, 40);
        let (a, b) = guide.endpoints;
        assert!((a[1] == 0 && b[1] == 64) || (a[1] == 64 && b[1] == 0));
    }

    #[test]
    fn missed_tick_fades_but_keeps_reporting_the_guide() {
        let frame = frame_with_vertical_edge(64, 64, 32);
        let viewport = Viewport::new(64, 64);
        let mut detector = GuideDetector::new(TrackerOptions::default(), true);
        detector.process(&frame.as_view(), &test_params(), viewport);

        let report = detector.process_missed();
        assert!(report.skipped);
        assert_eq!(report.guides.len(), 1);
        let guide = &report.guides[0];
        assert_eq!(guide.confidence, 32);
        assert!(!guide.extended);
        assert_eq!(guide.endpoints, (guide.segment.p0, guide.segment.p1));
    }

    #[test]
    fn blank_frames_eventually_clear_all_guides() {
        let edge_frame = frame_with_vertical_edge(64, 64, 32);
        let blank = RgbFrame::new(64, 64, vec![128u8; 64 * 64 * 3]);
        let viewport = Viewport::new(64, 64);
        let mut detector = GuideDetector::new(TrackerOptions::default(), true);
        detector.process(&edge_frame.as_view(), &test_params(), viewport);

        for _ in 0..5 {
            detector.process(&blank.as_view(), &test_params(), viewport);
        }
        let report = detector.process(&blank.as_view(), &test_params(), viewport);
        assert!(report.guides.is_empty());
    }
}
