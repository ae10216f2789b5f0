//! Fixed-interval tick loop around a [`FrameSource`] and a [`GuideDetector`].
//!
//! Each tick re-reads the parameter file, captures one frame, and runs the
//! pipeline. A tick that cannot produce a usable frame is not fatal: the
//! runner logs it and applies the miss path so tracked guides fade instead
//! of freezing. When processing overruns the interval, the late tick is
//! dropped rather than queued; the loop realigns on the next boundary.
use crate::params::load_params;
use crate::pipeline::{FrameReport, GuideDetector};
use crate::source::{CaptureError, FrameSource};
use crate::types::Viewport;
use log::{debug, warn};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const DEFAULT_INTERVAL: Duration = Duration::from_millis(30);

/// Drives the detector at a fixed cadence.
pub struct TickRunner<S: FrameSource> {
    source: S,
    detector: GuideDetector,
    params_path: PathBuf,
    interval: Duration,
}

impl<S: FrameSource> TickRunner<S> {
    pub fn new(source: S, detector: GuideDetector, params_path: PathBuf) -> Self {
        Self {
            source,
            detector,
            params_path,
            interval: DEFAULT_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run exactly one tick: reload parameters, capture, process.
    pub fn tick(&mut self) -> FrameReport {
        let params = load_params(&self.params_path);
        let region = self.source.region();
        match self.capture_checked(region) {
            Ok(frame) => self.detector.process(&frame.as_view(), &params, region),
            Err(err) => {
                warn!("TickRunner::tick capture failed: {err}");
                self.detector.process_missed()
            }
        }
    }

    /// Run `n` ticks at the configured interval, returning every report.
    ///
    /// Sleeps out the remainder of each interval; an overrunning tick skips
    /// its sleep and the next tick starts immediately.
    pub fn run_ticks(&mut self, n: usize) -> Vec<FrameReport> {
        let mut reports = Vec::with_capacity(n);
        for i in 0..n {
            let start = Instant::now();
            reports.push(self.tick());
            let elapsed = start.elapsed();
            if let Some(remaining) = self.interval.checked_sub(elapsed) {
                if !remaining.is_zero() {
                    std::thread::sleep(remaining);
                }
            } else {
                debug!(
                    "TickRunner::run_ticks tick {i} overran the interval ({:.1} ms > {:.1} ms)",
                    elapsed.as_secs_f64() * 1000.0,
                    self.interval.as_secs_f64() * 1000.0
                );
            }
        }
        reports
    }

    fn capture_checked(&mut self, region: Viewport) -> Result<crate::image::RgbFrame, CaptureError> {
        let frame = self.source.capture()?;
        let got = Viewport::new(frame.width as i32, frame.height as i32);
        if got != region {
            return Err(CaptureError::RegionMismatch {
                expected: region,
                got,
            });
        }
        Ok(frame)
    }
}
