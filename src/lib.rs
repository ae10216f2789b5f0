#![doc = include_str!("../README.md")]

// Core pipeline stages in dependency order.
pub mod image;
pub mod params;
pub mod features;
pub mod verify;
pub mod tracker;
pub mod extend;
pub mod pipeline;

// Collaborator interfaces and the periodic driver.
pub mod source;
pub mod runner;

pub mod types;

// --- High-level re-exports -------------------------------------------------

pub use crate::extend::extend_to_viewport;
pub use crate::params::Params;
pub use crate::pipeline::{FrameReport, GuideDetector, GuideLine};
pub use crate::tracker::{LineTracker, MatchPolicy, TrackerOptions};
pub use crate::types::{Point, Segment, Viewport};
pub use crate::verify::verify_lines;

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::params::Params;
    pub use crate::pipeline::{FrameReport, GuideDetector, GuideLine};
    pub use crate::tracker::{LineTracker, TrackerOptions};
    pub use crate::types::{Point, Segment, Viewport};
}
