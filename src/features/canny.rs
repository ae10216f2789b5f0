//! Dual-threshold edge detection producing a binary edge map.
//!
//! Canny-style chain on the smoothed luma plane:
//!
//! - 3×3 Sobel gradients with border clamping (replicate).
//! - Non-maximum suppression along the quantized gradient direction; ties are
//!   broken asymmetrically (kept when equal to the first neighbor, suppressed
//!   when equal to the second) so a perfectly symmetric two-pixel step keeps
//!   exactly one response.
//! - Hysteresis: magnitudes at or above the high threshold seed edges, and
//!   suppressed-maximum pixels at or above the low threshold are linked
//!   through 8-connectivity.
//!
//! Thresholds are in raw Sobel units (a full-range step is ≈ 1020). The two
//! configured thresholds may arrive in either order; the lower one always
//! acts as the link threshold.
use crate::image::{GrayImageU8, ImageF32};
use crate::types::Point;

const TAN_22_5_DEG: f32 = 0.41421356237;

/// Binary edge map plus its extracted foreground point cloud.
#[derive(Clone, Debug)]
pub struct EdgeMap {
    pub w: usize,
    pub h: usize,
    pub mask: Vec<bool>,
}

impl EdgeMap {
    pub fn empty(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            mask: vec![false; w * h],
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> bool {
        self.mask[y * self.w + x]
    }

    /// All foreground pixel coordinates in row-major scan order.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.h {
            let row = &self.mask[y * self.w..(y + 1) * self.w];
            for (x, &on) in row.iter().enumerate() {
                if on {
                    points.push([x as i32, y as i32]);
                }
            }
        }
        points
    }
}

struct Grad {
    gx: ImageF32,
    gy: ImageF32,
    mag: ImageF32,
}

fn sobel_gradients(l: &GrayImageU8) -> Grad {
    let w = l.w;
    let h = l.h;
    let mut gx = ImageF32::new(w, h);
    let mut gy = ImageF32::new(w, h);
    let mut mag = ImageF32::new(w, h);

    for y in 0..h {
        let y_idx = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        let rows = [l.row(y_idx[0]), l.row(y_idx[1]), l.row(y_idx[2])];
        let out_gx = gx.row_mut(y);
        for x in 0..w {
            let xl = x.saturating_sub(1);
            let xr = (x + 1).min(w - 1);
            let (top, mid, bot) = (rows[0], rows[1], rows[2]);
            let sum_x = (top[xr] as f32 - top[xl] as f32)
                + 2.0 * (mid[xr] as f32 - mid[xl] as f32)
                + (bot[xr] as f32 - bot[xl] as f32);
            out_gx[x] = sum_x;
        }
        let out_gy = gy.row_mut(y);
        let out_mag = mag.row_mut(y);
        for x in 0..w {
            let xl = x.saturating_sub(1);
            let xr = (x + 1).min(w - 1);
            let (top, bot) = (rows[0], rows[2]);
            let sum_y = (bot[xl] as f32 - top[xl] as f32)
                + 2.0 * (bot[x] as f32 - top[x] as f32)
                + (bot[xr] as f32 - top[xr] as f32);
            out_gy[x] = sum_y;
            let sum_x = gx.get(x, y);
            out_mag[x] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad { gx, gy, mag }
}

/// Detect edges with the given dual thresholds (order-insensitive).
pub fn detect_edges(l: &GrayImageU8, threshold1: f32, threshold2: f32) -> EdgeMap {
    let w = l.w;
    let h = l.h;
    if w < 3 || h < 3 {
        return EdgeMap::empty(w, h);
    }
    let low = threshold1.min(threshold2);
    let high = threshold1.max(threshold2);

    let grad = sobel_gradients(l);

    // Thinned candidates: 0 = suppressed, 1 = weak, 2 = strong.
    let mut labels = vec![0u8; w * h];
    let mut strong: Vec<(usize, usize)> = Vec::new();
    for y in 1..h - 1 {
        let mag_prev = grad.mag.row(y - 1);
        let mag_row = grad.mag.row(y);
        let mag_next = grad.mag.row(y + 1);
        let gx_row = grad.gx.row(y);
        let gy_row = grad.gy.row(y);

        for x in 1..w - 1 {
            let mag = mag_row[x];
            if mag < low {
                continue;
            }

            let gx = gx_row[x];
            let gy = gy_row[x];
            let abs_gx = gx.abs();
            let abs_gy = gy.abs();
            let same_sign = (gx >= 0.0 && gy >= 0.0) || (gx <= 0.0 && gy <= 0.0);

            let (neighbor1, neighbor2) = if abs_gx >= abs_gy {
                if abs_gy <= abs_gx * TAN_22_5_DEG {
                    (mag_row[x - 1], mag_row[x + 1])
                } else if same_sign {
                    (mag_prev[x + 1], mag_next[x - 1])
                } else {
                    (mag_prev[x - 1], mag_next[x + 1])
                }
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag_prev[x], mag_next[x])
            } else if same_sign {
                (mag_prev[x + 1], mag_next[x - 1])
            } else {
                (mag_prev[x - 1], mag_next[x + 1])
            };

            if mag < neighbor1 || mag <= neighbor2 {
                continue;
            }

            let idx = y * w + x;
            if mag >= high {
                labels[idx] = 2;
                strong.push((x, y));
            } else {
                labels[idx] = 1;
            }
        }
    }

    // Hysteresis: grow strong seeds through weak neighbors (8-connected).
    let mut out = EdgeMap::empty(w, h);
    let mut stack = strong;
    while let Some((x, y)) = stack.pop() {
        let idx = y * w + x;
        if out.mask[idx] {
            continue;
        }
        out.mask[idx] = true;
        for dy in -1i32..=1 {
            for dx in -1i32..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 1 || ny < 1 || nx >= w as i32 - 1 || ny >= h as i32 - 1 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                let nidx = ny * w + nx;
                if labels[nidx] > 0 && !out.mask[nidx] {
                    stack.push((nx, ny));
                }
            }
        }
    }
    out
}
