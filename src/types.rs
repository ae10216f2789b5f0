//! Core geometric types shared across the pipeline.
//!
//! Coordinates are integer image-space pixels. `Segment` identity is exact
//! coordinate equality (derived `Eq`/`Hash`); the tracker builds on this, see
//! `tracker::MatchPolicy` for the optional similarity-based alternative.
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Edge pixel coordinate `[x, y]` in image space.
pub type Point = [i32; 2];

/// Straight line segment between two pixel endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub p0: Point,
    pub p1: Point,
}

impl Segment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self {
            p0: [x1, y1],
            p1: [x2, y2],
        }
    }

    /// Both endpoints coincide; such a segment carries no direction.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p0 == self.p1
    }

    #[inline]
    pub fn p0f(&self) -> Vector2<f32> {
        Vector2::new(self.p0[0] as f32, self.p0[1] as f32)
    }

    #[inline]
    pub fn p1f(&self) -> Vector2<f32> {
        Vector2::new(self.p1[0] as f32, self.p1[1] as f32)
    }

    pub fn length_sq(&self) -> i64 {
        let dx = (self.p1[0] - self.p0[0]) as i64;
        let dy = (self.p1[1] - self.p0[1]) as i64;
        dx * dx + dy * dy
    }

    pub fn length(&self) -> f32 {
        (self.length_sq() as f32).sqrt()
    }

    pub fn midpoint(&self) -> Vector2<f32> {
        (self.p0f() + self.p1f()) * 0.5
    }

    /// Direction angle in radians, folded to [0, π).
    pub fn angle(&self) -> f32 {
        let d = self.p1f() - self.p0f();
        d.y.atan2(d.x).rem_euclid(std::f32::consts::PI)
    }
}

/// Rectangular display bounds that guide lines are extended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_identity_is_exact_equality() {
        let a = Segment::new(0, 0, 10, 10);
        let b = Segment::new(0, 0, 10, 10);
        let c = Segment::new(0, 0, 10, 11);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn angle_folds_to_half_turn() {
        let a = Segment::new(0, 0, 10, 0);
        let b = Segment::new(10, 0, 0, 0);
        assert!((a.angle() - b.angle()).abs() < 1e-6);
    }
}
