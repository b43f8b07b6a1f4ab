//! Synthetic raster generators.
//!
//! Rasters are written as rows of characters, one per pixel, mapped through a
//! legend. This keeps the geometry of a test visible in its source.

use image::{Rgb as Pixel, RgbImage};
use radar_common::{RegionOfInterest, Rgb};

/// Build a raster from ASCII rows.
///
/// # Panics
///
/// Panics if rows differ in length or use a character missing from `legend`.
///
/// # Example
///
/// ```
/// use test_utils::{raster_from_rows, two_category_legend};
///
/// let raster = raster_from_rows(&["aa?bb"], &two_category_legend());
/// assert_eq!(raster.dimensions(), (5, 1));
/// ```
pub fn raster_from_rows(rows: &[&str], legend: &[(char, Rgb)]) -> RgbImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.chars().count()) as u32;

    let mut raster = RgbImage::new(width, height);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(
            row.chars().count() as u32,
            width,
            "row {} has a different width",
            y
        );
        for (x, c) in row.chars().enumerate() {
            let color = legend
                .iter()
                .find(|(key, _)| *key == c)
                .map(|(_, color)| *color)
                .unwrap_or_else(|| panic!("character '{}' not in legend", c));
            raster.put_pixel(x as u32, y as u32, Pixel(color.channels()));
        }
    }
    raster
}

/// A `width x height` raster of a single colour.
pub fn solid_raster(width: u32, height: u32, color: Rgb) -> RgbImage {
    RgbImage::from_pixel(width, height, Pixel(color.channels()))
}

/// Surround `inner` with the margins of `roi`, painted in `chrome`.
///
/// The result is a raw capture whose region of interest is exactly `inner`.
pub fn capture_with_margins(inner: &RgbImage, roi: &RegionOfInterest, chrome: Rgb) -> RgbImage {
    let width = inner.width() + roi.left + roi.right;
    let height = inner.height() + roi.top + roi.bottom;
    let mut capture = solid_raster(width, height, chrome);
    image::imageops::replace(&mut capture, inner, roi.left as i64, roi.top as i64);
    capture
}

/// A square radar-like picture: background outside a centred disk of
/// `radius`, `inside` colour within it, and a vertical band of `band`
/// colour through the middle of the disk.
pub fn radar_disk(side: u32, radius: u32, background: Rgb, inside: Rgb, band: Rgb) -> RgbImage {
    let center = side as i64 / 2;
    let r2 = (radius as i64) * (radius as i64);
    RgbImage::from_fn(side, side, |x, y| {
        let dx = x as i64 - center;
        let dy = y as i64 - center;
        let color = if dx * dx + dy * dy >= r2 {
            background
        } else if dx.abs() <= 1 {
            band
        } else {
            inside
        };
        Pixel(color.channels())
    })
}
