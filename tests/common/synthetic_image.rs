use guide_detector::image::RgbFrame;
use guide_detector::params::Params;

/// Generates a frame split by a sharp vertical edge at `edge_x`.
pub fn vertical_edge_frame(width: usize, height: usize, edge_x: usize) -> RgbFrame {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(edge_x < width, "edge must lie inside the frame");

    let mut data = vec![0u8; width * height * 3];
    for y in 0..height {
        for x in 0..width {
            let val = if x < edge_x { 30u8 } else { 220u8 };
            let i = (y * width + x) * 3;
            data[i] = val;
            data[i + 1] = val;
            data[i + 2] = val;
        }
    }
    RgbFrame::new(width, height, data)
}

/// Generates a featureless mid-gray frame.
pub fn blank_frame(width: usize, height: usize) -> RgbFrame {
    RgbFrame::new(width, height, vec![128u8; width * height * 3])
}

/// Parameter set tuned for the clean synthetic frames above; the compiled-in
/// defaults expect real noisy captures.
pub fn synthetic_params() -> Params {
    Params {
        bilateral_d: 5,
        bilateral_sigma_color: 30.0,
        bilateral_sigma_space: 2.0,
        canny_threshold1: 100.0,
        canny_threshold2: 250.0,
        hough_threshold: 20,
        hough_min_line_length: 20,
        hough_max_line_gap: 2,
        hough_threshold_long: 20,
        hough_min_line_length_long: 20,
        hough_max_line_gap_long: 2,
        hough_threshold_short: 10,
        hough_min_line_length_short: 5,
        hough_max_line_gap_short: 2,
        min_inliers: 20,
        ..Params::default()
    }
}
