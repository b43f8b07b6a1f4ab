//! Region-of-interest extraction.
//!
//! A raw meteorad capture carries a legend, a title bar and a border around
//! the radar picture. The margins are fixed for the capture layout, so the
//! crop is a plain sub-rectangle.

use image::{imageops, RgbImage};
use radar_common::{RadarError, RadarResult, RegionOfInterest};

/// Crop the radar picture out of a raw capture.
///
/// Fails with [`RadarError::ShapeMismatch`] when the capture is not the size
/// the margins were calibrated for, or when the margins leave nothing.
pub fn extract_roi(raster: &RgbImage, roi: &RegionOfInterest) -> RadarResult<RgbImage> {
    let (width, height) = raster.dimensions();

    if let Some((expected_w, expected_h)) = roi.source_size {
        if (expected_w, expected_h) != (width, height) {
            return Err(RadarError::shape_mismatch(
                format!("{}x{} capture", expected_w, expected_h),
                format!("{}x{}", width, height),
            ));
        }
    }

    let horizontal = roi.left as u64 + roi.right as u64;
    let vertical = roi.top as u64 + roi.bottom as u64;
    if horizontal >= width as u64 || vertical >= height as u64 {
        return Err(RadarError::shape_mismatch(
            format!(
                "capture larger than {}x{} margins",
                horizontal, vertical
            ),
            format!("{}x{}", width, height),
        ));
    }

    let crop_w = width - roi.left - roi.right;
    let crop_h = height - roi.top - roi.bottom;
    Ok(imageops::crop_imm(raster, roi.left, roi.top, crop_w, crop_h).to_image())
}
