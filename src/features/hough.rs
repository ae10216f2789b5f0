//! Progressive probabilistic Hough transform over a binary edge map.
//!
//! Classic accumulator formulation: rho resolution 1 px, theta resolution 1
//! degree over [0, π). Edge pixels are visited in a shuffled order (seeded
//! xorshift, so runs are reproducible); each visited pixel votes across all
//! angle bins, and once a bin crosses the vote threshold the corresponding
//! line is traced through the mask in both directions, tolerating up to
//! `max_line_gap` consecutive misses. Traced pixels are consumed (removed
//! from the mask, their votes retracted) whether or not the trace produced a
//! segment of acceptable length, so evidence is never counted twice.
use super::canny::EdgeMap;
use crate::types::Segment;
use log::debug;

/// Knobs of one Hough pass, already clamped by `Params::sanitized`.
#[derive(Clone, Copy, Debug)]
pub struct HoughParams {
    /// Minimum accumulator votes before a line is traced.
    pub threshold: i32,
    /// Minimum x- or y-span of an accepted segment, in pixels.
    pub min_line_length: i32,
    /// Maximum run of non-edge pixels bridged while tracing.
    pub max_line_gap: i32,
}

const NUM_ANGLE: usize = 180;
const THETA_STEP: f32 = std::f32::consts::PI / NUM_ANGLE as f32;
const SHUFFLE_SEED: u32 = 0x2f6e_2b15;

#[inline]
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Detect line segments in `edges`. May return an empty vector.
pub fn hough_lines_p(edges: &EdgeMap, params: &HoughParams) -> Vec<Segment> {
    let w = edges.w as i32;
    let h = edges.h as i32;
    let mut points = edges.points();
    if points.is_empty() {
        return Vec::new();
    }

    // Deterministic Fisher-Yates so identical frames yield identical output.
    let mut rng = SHUFFLE_SEED;
    for i in (1..points.len()).rev() {
        let j = (xorshift32(&mut rng) as usize) % (i + 1);
        points.swap(i, j);
    }

    let num_rho = (2 * (w + h) + 1) as usize;
    let rho_offset = w + h;
    let trig: Vec<(f32, f32)> = (0..NUM_ANGLE)
        .map(|n| {
            let theta = n as f32 * THETA_STEP;
            (theta.cos(), theta.sin())
        })
        .collect();

    let mut accum = vec![0i32; NUM_ANGLE * num_rho];
    let mut mask = edges.mask.clone();
    let mut segments = Vec::new();

    for &[px, py] in &points {
        let idx = (py * w + px) as usize;
        // Consumed by an earlier line trace.
        if !mask[idx] {
            continue;
        }

        let mut max_votes = 0;
        let mut max_n = 0usize;
        for (n, &(cos_t, sin_t)) in trig.iter().enumerate() {
            let r = (px as f32 * cos_t + py as f32 * sin_t).round() as i32 + rho_offset;
            let votes = {
                let cell = &mut accum[n * num_rho + r as usize];
                *cell += 1;
                *cell
            };
            if votes > max_votes {
                max_votes = votes;
                max_n = n;
            }
        }
        if max_votes < params.threshold {
            continue;
        }

        // Direction along the candidate line (perpendicular to its normal).
        let (cos_t, sin_t) = trig[max_n];
        let (a, b) = (-sin_t, cos_t);
        let (dx0, dy0) = if a.abs() > b.abs() {
            (a.signum(), b / a.abs())
        } else {
            (a / b.abs(), b.signum())
        };

        // Trace both directions, bridging gaps up to the configured run.
        let mut line_end = [[px, py], [px, py]];
        for (k, end) in line_end.iter_mut().enumerate() {
            let (sx, sy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (px as f32, py as f32);
            let mut gap = 0;
            loop {
                x += sx;
                y += sy;
                let xi = x.round() as i32;
                let yi = y.round() as i32;
                if xi < 0 || yi < 0 || xi >= w || yi >= h {
                    break;
                }
                if mask[(yi * w + xi) as usize] {
                    gap = 0;
                    *end = [xi, yi];
                } else {
                    gap += 1;
                    if gap > params.max_line_gap {
                        break;
                    }
                }
            }
        }

        let span_x = (line_end[1][0] - line_end[0][0]).abs();
        let span_y = (line_end[1][1] - line_end[0][1]).abs();
        let good_line = span_x >= params.min_line_length || span_y >= params.min_line_length;

        // Consume the traced pixels; retract their votes when the trace is
        // promoted to a segment.
        for (k, end) in line_end.iter().enumerate() {
            let (sx, sy) = if k == 0 { (dx0, dy0) } else { (-dx0, -dy0) };
            let (mut x, mut y) = (px as f32, py as f32);
            loop {
                let xi = x.round() as i32;
                let yi = y.round() as i32;
                if xi < 0 || yi < 0 || xi >= w || yi >= h {
                    break;
                }
                let pidx = (yi * w + xi) as usize;
                if mask[pidx] {
                    if good_line {
                        for (n, &(cos_t, sin_t)) in trig.iter().enumerate() {
                            let r = (xi as f32 * cos_t + yi as f32 * sin_t).round() as i32
                                + rho_offset;
                            accum[n * num_rho + r as usize] -= 1;
                        }
                    }
                    mask[pidx] = false;
                }
                if [xi, yi] == *end {
                    break;
                }
                x += sx;
                y += sy;
            }
        }

        if good_line {
            segments.push(Segment {
                p0: line_end[0],
                p1: line_end[1],
            });
        }
    }

    debug!(
        "hough_lines_p points={} threshold={} -> segments={}",
        points.len(),
        params.threshold,
        segments.len()
    );
    segments
}
