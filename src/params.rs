//! Live-tunable processing parameters.
//!
//! The knob set mirrors the persisted JSON document an external tuning UI
//! writes: bilateral filter, edge-detection thresholds, probabilistic Hough
//! settings (single mode plus the long/short dual-mode variants) and the
//! verifier's minimum inlier count. The file is re-read every tick so edits
//! take effect live; missing keys fall back to compiled-in defaults via
//! `#[serde(default)]`, and an unreadable or unparsable file falls back to
//! the full default set. Field renames preserve the historical key spelling.
//!
//! Out-of-domain values (a user mid-drag on a tuning slider can transiently
//! produce them) are clamped by [`Params::sanitized`], never rejected.
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

// Compiled-in defaults, kept separate from any file-backed copy.
const BILATERAL_D: i32 = 20;
const BILATERAL_SIGMA_COLOR: f32 = 200.0;
const BILATERAL_SIGMA_SPACE: f32 = 1.0;
const CANNY_THRESHOLD1: f32 = 500.0;
const CANNY_THRESHOLD2: f32 = 350.0;
const HOUGH_THRESHOLD: i32 = 20;
const HOUGH_MIN_LINE_LENGTH: i32 = 1;
const HOUGH_MAX_LINE_GAP: i32 = 1;
const HOUGH_THRESHOLD_LONG: i32 = 20;
const HOUGH_MIN_LINE_LENGTH_LONG: i32 = 20;
const HOUGH_MAX_LINE_GAP_LONG: i32 = 1;
const HOUGH_THRESHOLD_SHORT: i32 = 5;
const HOUGH_MIN_LINE_LENGTH_SHORT: i32 = 1;
const HOUGH_MAX_LINE_GAP_SHORT: i32 = 1;
const MIN_INLIERS: i32 = 20;

/// Cost bound for the bilateral neighborhood.
const MAX_BILATERAL_D: i32 = 25;

/// Numeric knob set read once per frame. Never mutated by the core.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    pub bilateral_d: i32,
    #[serde(rename = "bilateral_sigmaColor")]
    pub bilateral_sigma_color: f32,
    #[serde(rename = "bilateral_sigmaSpace")]
    pub bilateral_sigma_space: f32,
    pub canny_threshold1: f32,
    pub canny_threshold2: f32,
    pub hough_threshold: i32,
    #[serde(rename = "hough_minLineLength")]
    pub hough_min_line_length: i32,
    #[serde(rename = "hough_maxLineGap")]
    pub hough_max_line_gap: i32,
    pub hough_threshold_long: i32,
    #[serde(rename = "hough_minLineLength_long")]
    pub hough_min_line_length_long: i32,
    #[serde(rename = "hough_maxLineGap_long")]
    pub hough_max_line_gap_long: i32,
    pub hough_threshold_short: i32,
    #[serde(rename = "hough_minLineLength_short")]
    pub hough_min_line_length_short: i32,
    #[serde(rename = "hough_maxLineGap_short")]
    pub hough_max_line_gap_short: i32,
    pub min_inliers: i32,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            bilateral_d: BILATERAL_D,
            bilateral_sigma_color: BILATERAL_SIGMA_COLOR,
            bilateral_sigma_space: BILATERAL_SIGMA_SPACE,
            canny_threshold1: CANNY_THRESHOLD1,
            canny_threshold2: CANNY_THRESHOLD2,
            hough_threshold: HOUGH_THRESHOLD,
            hough_min_line_length: HOUGH_MIN_LINE_LENGTH,
            hough_max_line_gap: HOUGH_MAX_LINE_GAP,
            hough_threshold_long: HOUGH_THRESHOLD_LONG,
            hough_min_line_length_long: HOUGH_MIN_LINE_LENGTH_LONG,
            hough_max_line_gap_long: HOUGH_MAX_LINE_GAP_LONG,
            hough_threshold_short: HOUGH_THRESHOLD_SHORT,
            hough_min_line_length_short: HOUGH_MIN_LINE_LENGTH_SHORT,
            hough_max_line_gap_short: HOUGH_MAX_LINE_GAP_SHORT,
            min_inliers: MIN_INLIERS,
        }
    }
}

impl Params {
    /// Return a copy with every knob clamped into its valid domain.
    ///
    /// Clamping rules: bilateral diameter in `[1, 25]`, sigmas in
    /// `[0.1, 500]`, edge thresholds non-negative (the lower/higher of the
    /// pair is picked downstream, so their order in the file is free), Hough
    /// vote thresholds and minimum lengths at least 1, gaps non-negative,
    /// inlier count non-negative.
    pub fn sanitized(&self) -> Params {
        let clamped = Params {
            bilateral_d: self.bilateral_d.clamp(1, MAX_BILATERAL_D),
            bilateral_sigma_color: self.bilateral_sigma_color.clamp(0.1, 500.0),
            bilateral_sigma_space: self.bilateral_sigma_space.clamp(0.1, 500.0),
            canny_threshold1: self.canny_threshold1.max(0.0),
            canny_threshold2: self.canny_threshold2.max(0.0),
            hough_threshold: self.hough_threshold.max(1),
            hough_min_line_length: self.hough_min_line_length.max(1),
            hough_max_line_gap: self.hough_max_line_gap.max(0),
            hough_threshold_long: self.hough_threshold_long.max(1),
            hough_min_line_length_long: self.hough_min_line_length_long.max(1),
            hough_max_line_gap_long: self.hough_max_line_gap_long.max(0),
            hough_threshold_short: self.hough_threshold_short.max(1),
            hough_min_line_length_short: self.hough_min_line_length_short.max(1),
            hough_max_line_gap_short: self.hough_max_line_gap_short.max(0),
            min_inliers: self.min_inliers.max(0),
        };
        if clamped != *self {
            debug!("Params::sanitized clamped out-of-domain values");
        }
        clamped
    }
}

/// Read the persisted parameter file, falling back to defaults on any failure.
///
/// A half-written file (the tuning UI saves on every slider change) must not
/// kill a tick, so read and parse errors both degrade to `Params::default()`.
pub fn load_params(path: &Path) -> Params {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(params) => params,
            Err(err) => {
                debug!("load_params parse failed for {}: {err}", path.display());
                Params::default()
            }
        },
        Err(err) => {
            debug!("load_params read failed for {}: {err}", path.display());
            Params::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let params: Params = serde_json::from_str(r#"{"hough_threshold": 42}"#).unwrap();
        assert_eq!(params.hough_threshold, 42);
        assert_eq!(params.bilateral_d, BILATERAL_D);
        assert_eq!(params.min_inliers, MIN_INLIERS);
    }

    #[test]
    fn historical_key_spellings_are_honored() {
        let params: Params =
            serde_json::from_str(r#"{"bilateral_sigmaColor": 80.0, "hough_minLineLength": 7}"#)
                .unwrap();
        assert_eq!(params.bilateral_sigma_color, 80.0);
        assert_eq!(params.hough_min_line_length, 7);
    }

    #[test]
    fn sanitized_clamps_out_of_domain_knobs() {
        let raw = Params {
            bilateral_d: -3,
            bilateral_sigma_color: 0.0,
            hough_threshold: 0,
            hough_min_line_length: -5,
            min_inliers: -1,
            ..Params::default()
        };
        let clean = raw.sanitized();
        assert_eq!(clean.bilateral_d, 1);
        assert!(clean.bilateral_sigma_color > 0.0);
        assert_eq!(clean.hough_threshold, 1);
        assert_eq!(clean.hough_min_line_length, 1);
        assert_eq!(clean.min_inliers, 0);
    }

    #[test]
    fn unreadable_file_yields_defaults() {
        let params = load_params(Path::new("/nonexistent/params.json"));
        assert_eq!(params, Params::default());
    }
}
