//! Circular scan coverage.
//!
//! The radar scans a disk. The crop is usually wider than it is tall, so the
//! disk is laid out on a square of side `max(width, height)` and the crop sits
//! centred inside that square. Pixels outside the disk are background no
//! matter what colour they were rendered in (map tiles bleed through there).

use crate::mask::Mask;

/// The scan disk for a `width x height` crop. `true` means inside.
///
/// A pixel is inside when its squared distance from the square's centre is
/// strictly less than the squared radius, with centre and radius both
/// `side / 2` in integer pixels.
pub fn coverage_disk(width: u32, height: u32) -> Mask {
    let side = width.max(height) as i64;
    let center = side / 2;
    let radius_sq = center * center;
    let offset_x = (side - width as i64) / 2;
    let offset_y = (side - height as i64) / 2;

    Mask::from_fn(width, height, |x, y| {
        let dx = x as i64 + offset_x - center;
        let dy = y as i64 + offset_y - center;
        dx * dx + dy * dy < radius_sq
    })
}

/// Force every pixel outside the scan disk into the background mask.
///
/// Only adds coverage; pixels already set stay set.
pub fn expand_background(background: &mut Mask) {
    let (width, height) = background.dimensions();
    let disk = coverage_disk(width, height);
    for (x, y) in disk.inverted().iter_set() {
        background.set(x, y, true);
    }
}
