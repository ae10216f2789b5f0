//! Minimal owned/borrowed image buffers used by the pipeline.
//!
//! - `RgbFrame` / `RgbImageU8`: captured color frames (owned / borrowed view).
//! - `GrayImageU8`: owned 8-bit luma plane, the working format of the
//!   smoothing and edge stages.
//! - `ImageF32`: owned float plane for gradient buffers.
//!
//! All buffers are row-major and tightly packed (stride == width). File I/O
//! lives in [`io`]; the core never touches the filesystem.
pub mod io;

/// Owned interleaved 8-bit RGB frame as delivered by a capture source.
#[derive(Clone, Debug)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    /// `width * height * 3` bytes, R-G-B interleaved.
    pub data: Vec<u8>,
}

impl RgbFrame {
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height * 3);
        Self {
            width,
            height,
            data,
        }
    }

    /// Borrow as a read-only view for processing.
    pub fn as_view(&self) -> RgbImageU8<'_> {
        RgbImageU8 {
            w: self.width,
            h: self.height,
            data: &self.data,
        }
    }
}

/// Borrowed read-only RGB view.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub data: &'a [u8],
}

impl RgbImageU8<'_> {
    /// One interleaved pixel row: `3 * w` bytes.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w * 3;
        &self.data[start..start + self.w * 3]
    }
}

/// Owned 8-bit single-channel (luma) plane.
#[derive(Clone, Debug)]
pub struct GrayImageU8 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl GrayImageU8 {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0u8; w * h],
        }
    }

    pub fn from_raw(w: usize, h: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), w * h);
        Self { w, h, data }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.w + x]
    }
}

/// Owned single-channel f32 plane for gradient/magnitude buffers.
#[derive(Clone, Debug)]
pub struct ImageF32 {
    pub w: usize,
    pub h: usize,
    pub data: Vec<f32>,
}

impl ImageF32 {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0.0; w * h],
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.w;
        &self.data[start..start + self.w]
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [f32] {
        let start = y * self.w;
        &mut self.data[start..start + self.w]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.w + x]
    }
}

// Rec.601 integer luma weights, scaled by 256.
const LUMA_R: u32 = 77;
const LUMA_G: u32 = 150;
const LUMA_B: u32 = 29;

/// Convert an RGB view to an owned luma plane.
pub fn rgb_to_luma(frame: &RgbImageU8) -> GrayImageU8 {
    let mut out = GrayImageU8::new(frame.w, frame.h);
    for y in 0..frame.h {
        let src = frame.row(y);
        let dst = &mut out.data[y * frame.w..(y + 1) * frame.w];
        for (x, px) in dst.iter_mut().enumerate() {
            let r = src[x * 3] as u32;
            let g = src[x * 3 + 1] as u32;
            let b = src[x * 3 + 2] as u32;
            *px = ((r * LUMA_R + g * LUMA_G + b * LUMA_B) >> 8) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_of_gray_pixel_is_identity_up_to_rounding() {
        let data = vec![128u8; 2 * 2 * 3];
        let frame = RgbFrame::new(2, 2, data);
        let gray = rgb_to_luma(&frame.as_view());
        for &v in &gray.data {
            assert!((v as i32 - 128).abs() <= 1, "luma={v}");
        }
    }

    #[test]
    fn luma_weights_favor_green() {
        let mut data = vec![0u8; 3];
        data[1] = 255; // pure green
        let frame = RgbFrame::new(1, 1, data);
        let gray = rgb_to_luma(&frame.as_view());
        assert!(gray.data[0] > 120);
    }
}
