//! Frame acquisition behind a trait.
//!
//! The pipeline never talks to a capture backend directly; it pulls frames
//! through [`FrameSource`] so the same runner drives live capture, recorded
//! footage, or the still-image source used by the demo binary and tests.
use crate::image::io::load_rgb_image;
use crate::image::RgbFrame;
use crate::types::Viewport;
use std::fmt;
use std::path::Path;

/// Errors a capture backend can surface on a tick.
#[derive(Debug)]
pub enum CaptureError {
    /// The backend produced no frame this tick (device busy, window gone).
    Unavailable(String),
    /// The delivered frame does not match the advertised capture region.
    RegionMismatch { expected: Viewport, got: Viewport },
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::Unavailable(reason) => write!(f, "capture unavailable: {reason}"),
            CaptureError::RegionMismatch { expected, got } => write!(
                f,
                "frame size {}x{} does not match capture region {}x{}",
                got.width, got.height, expected.width, expected.height
            ),
        }
    }
}

impl std::error::Error for CaptureError {}

/// A producer of RGB frames over a fixed capture region.
pub trait FrameSource {
    /// The region every delivered frame must cover.
    fn region(&self) -> Viewport;

    /// Produce the next frame. A failed tick is recoverable; the runner
    /// applies the tracker fade and moves on.
    fn capture(&mut self) -> Result<RgbFrame, CaptureError>;
}

/// A [`FrameSource`] that replays one decoded image forever.
pub struct StillImageSource {
    frame: RgbFrame,
}

impl StillImageSource {
    /// Decode `path` once; every later capture clones the decoded frame.
    pub fn open(path: &Path) -> Result<Self, String> {
        let frame = load_rgb_image(path)?;
        Ok(Self { frame })
    }

    pub fn from_frame(frame: RgbFrame) -> Self {
        Self { frame }
    }
}

impl FrameSource for StillImageSource {
    fn region(&self) -> Viewport {
        Viewport::new(self.frame.width as i32, self.frame.height as i32)
    }

    fn capture(&mut self) -> Result<RgbFrame, CaptureError> {
        Ok(self.frame.clone())
    }
}
