//! Frame-to-frame line identity with decaying confidence.
//!
//! Detection is frame-noisy: a real edge can vanish for a frame or two under
//! lighting or motion changes. Each tracked line therefore carries a
//! confidence that resets to the default on re-detection and fades by a
//! fixed step on every miss; a line is only dropped once its confidence
//! reaches zero. The displayed guide survives short dropouts at the cost of
//! briefly showing a stale line after the true edge moves.
//!
//! Life cycle per line: Active (confidence = default) → Fading (decreasing)
//! → Removed (≤ 0, dropped from all output).
use crate::types::Segment;

/// How a current detection is matched against a tracked line.
///
/// `Exact` (the default) requires coordinate-identical segments; sub-pixel
/// detector jitter then re-registers a stable edge as a new line. `Similar`
/// is the documented alternative: segments whose direction differs by at
/// most `angle_tol_deg` and whose midpoint sits within `offset_tol_px` of
/// the tracked line count as the same line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatchPolicy {
    Exact,
    Similar {
        angle_tol_deg: f32,
        offset_tol_px: f32,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct TrackerOptions {
    /// Confidence assigned on (re-)detection.
    pub default_confidence: i32,
    /// Per-tick decrement applied to lines missing from the current frame.
    pub fade_step: i32,
    pub match_policy: MatchPolicy,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            default_confidence: 40,
            fade_step: 8,
            match_policy: MatchPolicy::Exact,
        }
    }
}

/// A line the tracker currently remembers.
#[derive(Clone, Copy, Debug)]
struct TrackedLine {
    segment: Segment,
    confidence: i32,
    /// Consecutive frames this line went undetected.
    lost: u32,
}

/// Owner of all cross-frame line state; mutate only through [`update`].
///
/// [`update`]: LineTracker::update
pub struct LineTracker {
    options: TrackerOptions,
    tracked: Vec<TrackedLine>,
}

impl LineTracker {
    pub fn new(options: TrackerOptions) -> Self {
        Self {
            options,
            tracked: Vec::new(),
        }
    }

    /// Fold one frame's verified lines into the tracked set.
    ///
    /// Current lines enter at default confidence whether they are new or
    /// re-detections; previously tracked lines without a match fade by one
    /// step and are dropped once confidence is exhausted. An empty input
    /// fades everything.
    pub fn update(&mut self, current: &[Segment]) {
        let mut next: Vec<TrackedLine> = Vec::with_capacity(current.len() + self.tracked.len());
        for &segment in current {
            next.push(TrackedLine {
                segment,
                confidence: self.options.default_confidence,
                lost: 0,
            });
        }
        for old in &self.tracked {
            if current.iter().any(|s| self.matches(&old.segment, s)) {
                continue;
            }
            let confidence = old.confidence - self.options.fade_step;
            if confidence > 0 {
                next.push(TrackedLine {
                    segment: old.segment,
                    confidence,
                    lost: old.lost + 1,
                });
            }
        }
        self.tracked = next;
    }

    /// All surviving lines with their confidence. No ordering guarantee.
    pub fn stable_lines(&self) -> Vec<(Segment, i32)> {
        self.tracked
            .iter()
            .filter(|t| t.confidence > 0)
            .map(|t| (t.segment, t.confidence))
            .collect()
    }

    fn matches(&self, tracked: &Segment, current: &Segment) -> bool {
        match self.options.match_policy {
            MatchPolicy::Exact => tracked == current,
            MatchPolicy::Similar {
                angle_tol_deg,
                offset_tol_px,
            } => {
                let da = angle_difference(tracked.angle(), current.angle());
                if da > angle_tol_deg.to_radians() {
                    return false;
                }
                midpoint_line_distance(current, tracked) <= offset_tol_px
            }
        }
    }
}

impl Default for LineTracker {
    fn default() -> Self {
        Self::new(TrackerOptions::default())
    }
}

/// Smallest angular difference between two π-periodic directions.
fn angle_difference(a: f32, b: f32) -> f32 {
    let d = (a - b).abs();
    d.min(std::f32::consts::PI - d)
}

/// Perpendicular distance from the midpoint of `seg` to the infinite line
/// through `line`.
fn midpoint_line_distance(seg: &Segment, line: &Segment) -> f32 {
    let p0 = line.p0f();
    let dir = line.p1f() - p0;
    let len = dir.norm();
    if len <= f32::EPSILON {
        return (seg.midpoint() - p0).norm();
    }
    let normal = nalgebra::Vector2::new(-dir.y, dir.x) / len;
    (seg.midpoint() - p0).dot(&normal).abs()
}
