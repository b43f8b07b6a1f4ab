//! Debug rendering of a single mask.

use std::path::Path;

use image::{Rgba, RgbaImage};
use radar_common::RadarResult;

use crate::io::write_atomic;
use crate::mask::Mask;
use crate::png::{create_png_auto, Channels};

const SET: [u8; 3] = [0, 0, 0];
const UNSET: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// `true` pixels become black at `alpha`, `false` pixels transparent white.
pub fn reference_tile(mask: &Mask, alpha: u8) -> RgbaImage {
    let [r, g, b] = SET;
    let set = Rgba([r, g, b, alpha]);
    RgbaImage::from_fn(mask.width(), mask.height(), |x, y| {
        if mask.get(x, y) {
            set
        } else {
            UNSET
        }
    })
}

pub fn write_reference_tile(mask: &Mask, alpha: u8, output: &Path) -> RadarResult<()> {
    let tile = reference_tile(mask, alpha);
    let png = create_png_auto(
        tile.as_raw(),
        tile.width() as usize,
        tile.height() as usize,
        Channels::Rgba,
    )?;
    write_atomic(output, &png)
}
