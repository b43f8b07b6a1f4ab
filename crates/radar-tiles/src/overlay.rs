//! Dimming a masked region of a raster.

use image::RgbImage;
use radar_common::{RadarError, RadarResult};

use crate::mask::Mask;

/// Scale the HSV value of every masked pixel by `alpha`.
///
/// Hue and saturation are unchanged by a value scale, so this is the same as
/// scaling the three RGB channels by `alpha`.
pub fn overlay_mask(image: &RgbImage, mask: &Mask, alpha: f32) -> RadarResult<RgbImage> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(RadarError::InvalidParameter {
            param: "alpha".to_string(),
            message: format!("{} is outside [0, 1]", alpha),
        });
    }
    if image.dimensions() != mask.dimensions() {
        return Err(RadarError::shape_mismatch(
            format!("{}x{}", image.width(), image.height()),
            format!("{}x{}", mask.width(), mask.height()),
        ));
    }

    let mut output = image.clone();
    for (x, y) in mask.iter_set() {
        let pixel = output.get_pixel_mut(x, y);
        for channel in pixel.0.iter_mut() {
            *channel = (*channel as f32 * alpha).round() as u8;
        }
    }
    Ok(output)
}
