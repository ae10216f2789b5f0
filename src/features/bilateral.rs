//! Edge-preserving bilateral smoothing on the luma plane.
//!
//! - Square neighborhood of `diameter` pixels, restricted to the inscribed
//!   disc; spatial weights precomputed from `sigma_space`.
//! - Range weights come from a 256-entry LUT over absolute intensity
//!   difference, parameterized by `sigma_color`.
//! - Borders replicate by index clamping.
//!
//! Rows are processed in parallel; this is the most expensive per-pixel
//! stage of the pipeline by a wide margin.
use crate::image::GrayImageU8;
use rayon::prelude::*;

struct SpatialTap {
    dx: i32,
    dy: i32,
    weight: f32,
}

/// Smooth `src` while keeping strong intensity steps intact.
///
/// `diameter` is assumed already clamped to a sane range by
/// `Params::sanitized`; values below 3 degenerate to a near-identity filter.
pub fn bilateral_filter(
    src: &GrayImageU8,
    diameter: i32,
    sigma_color: f32,
    sigma_space: f32,
) -> GrayImageU8 {
    let w = src.w;
    let h = src.h;
    if w == 0 || h == 0 {
        return GrayImageU8::new(w, h);
    }

    let radius = (diameter / 2).max(1);
    let taps = spatial_taps(radius, sigma_space);
    let range_lut = range_lut(sigma_color);

    let mut out = GrayImageU8::new(w, h);
    out.data
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, dst_row)| {
            for (x, dst) in dst_row.iter_mut().enumerate() {
                let center = src.get(x, y) as f32;
                let mut weight_sum = 0.0f32;
                let mut value_sum = 0.0f32;
                for tap in &taps {
                    let sx = clamp_index(x as i32 + tap.dx, w);
                    let sy = clamp_index(y as i32 + tap.dy, h);
                    let sample = src.get(sx, sy) as f32;
                    let diff = (sample - center).abs() as usize;
                    let weight = tap.weight * range_lut[diff.min(255)];
                    weight_sum += weight;
                    value_sum += weight * sample;
                }
                *dst = (value_sum / weight_sum).round().clamp(0.0, 255.0) as u8;
            }
        });
    out
}

fn spatial_taps(radius: i32, sigma_space: f32) -> Vec<SpatialTap> {
    let gauss_coeff = -0.5 / (sigma_space * sigma_space);
    let r_sq = (radius * radius) as f32;
    let mut taps = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let dist_sq = (dx * dx + dy * dy) as f32;
            if dist_sq > r_sq {
                continue;
            }
            taps.push(SpatialTap {
                dx,
                dy,
                weight: (dist_sq * gauss_coeff).exp(),
            });
        }
    }
    taps
}

fn range_lut(sigma_color: f32) -> [f32; 256] {
    let gauss_coeff = -0.5 / (sigma_color * sigma_color);
    let mut lut = [0.0f32; 256];
    for (diff, entry) in lut.iter_mut().enumerate() {
        let d = diff as f32;
        *entry = (d * d * gauss_coeff).exp();
    }
    lut
}

#[inline]
fn clamp_index(i: i32, len: usize) -> usize {
    i.clamp(0, len as i32 - 1) as usize
}
