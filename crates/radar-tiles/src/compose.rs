//! Recompose category masks into a raster.

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use radar_common::{Palette, RadarResult};

use crate::mask::MaskSet;
use crate::png::{self, Channels};

/// Output flavour of a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// RGB raster in palette colours.
    Opaque,
    /// RGBA raster for drawing over a base map: background fully transparent,
    /// every other category at the overlay alpha.
    #[default]
    Overlay,
}

/// A composited raster.
#[derive(Debug, Clone, PartialEq)]
pub enum Composite {
    Opaque(RgbImage),
    Overlay(RgbaImage),
}

impl Composite {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Composite::Opaque(image) => image.dimensions(),
            Composite::Overlay(image) => image.dimensions(),
        }
    }

    /// Encode as PNG. Restored tiles carry only palette colours, so this is
    /// normally an indexed PNG.
    pub fn to_png(&self) -> RadarResult<Vec<u8>> {
        let (width, height) = self.dimensions();
        match self {
            Composite::Opaque(image) => png::create_png_auto(
                image.as_raw(),
                width as usize,
                height as usize,
                Channels::Rgb,
            ),
            Composite::Overlay(image) => png::create_png_auto(
                image.as_raw(),
                width as usize,
                height as usize,
                Channels::Rgba,
            ),
        }
    }

    pub fn into_rgb(self) -> Option<RgbImage> {
        match self {
            Composite::Opaque(image) => Some(image),
            Composite::Overlay(_) => None,
        }
    }

    pub fn into_rgba(self) -> Option<RgbaImage> {
        match self {
            Composite::Overlay(image) => Some(image),
            Composite::Opaque(_) => None,
        }
    }
}

/// Paint every category's mask in palette order.
///
/// Where masks overlap, the category later in the palette wins. Pixels in no
/// mask stay zero (black, and transparent in overlay mode).
pub fn join_split(
    masks: &MaskSet,
    palette: &Palette,
    mode: CompositeMode,
    overlay_alpha: u8,
) -> RadarResult<Composite> {
    let (width, height) = masks.dimensions();

    match mode {
        CompositeMode::Opaque => {
            let mut image = RgbImage::new(width, height);
            for category in palette.iter() {
                let color = Rgb(category.color.channels());
                for (x, y) in masks.get(&category.name)?.iter_set() {
                    image.put_pixel(x, y, color);
                }
            }
            Ok(Composite::Opaque(image))
        }
        CompositeMode::Overlay => {
            let mut image = RgbaImage::new(width, height);
            for category in palette.iter() {
                let alpha = if palette.is_background(&category.name) {
                    0
                } else {
                    overlay_alpha
                };
                let [r, g, b] = category.color.channels();
                let color = Rgba([r, g, b, alpha]);
                for (x, y) in masks.get(&category.name)?.iter_set() {
                    image.put_pixel(x, y, color);
                }
            }
            Ok(Composite::Overlay(image))
        }
    }
}
