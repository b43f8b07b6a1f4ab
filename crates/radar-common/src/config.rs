//! Pipeline configuration.
//!
//! Everything the raster pipeline needs is carried in [`PipelineConfig`] and
//! passed explicitly to each stage. Defaults reproduce the meteorad capture
//! layout and the historical tile corpus.

use serde::{Deserialize, Serialize};

use crate::palette::Palette;

/// Fixed margins cropped off a raw capture to leave only the radar picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    #[serde(default = "default_top")]
    pub top: u32,
    #[serde(default = "default_bottom")]
    pub bottom: u32,
    #[serde(default = "default_left")]
    pub left: u32,
    #[serde(default = "default_right")]
    pub right: u32,
    /// Expected `(width, height)` of the raw capture. Unset means any size
    /// large enough for the margins is accepted.
    #[serde(default)]
    pub source_size: Option<(u32, u32)>,
}

fn default_top() -> u32 {
    55
}

fn default_bottom() -> u32 {
    22
}

fn default_left() -> u32 {
    277
}

fn default_right() -> u32 {
    578
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        Self {
            top: default_top(),
            bottom: default_bottom(),
            left: default_left(),
            right: default_right(),
            source_size: None,
        }
    }
}

impl RegionOfInterest {
    /// A region that keeps the whole raster.
    pub const fn full() -> Self {
        Self {
            top: 0,
            bottom: 0,
            left: 0,
            right: 0,
            source_size: None,
        }
    }
}

/// Parameters for restoring one capture into a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub palette: Palette,

    #[serde(default)]
    pub roi: RegionOfInterest,

    /// Gap filling neighbourhood radius; the window side is `2 * radius + 1`.
    #[serde(default = "default_radius")]
    pub radius: u32,

    /// Alpha of non-background categories in overlay tiles.
    #[serde(default = "default_overlay_alpha")]
    pub overlay_alpha: u8,

    /// Alpha of `true` pixels in reference tiles.
    #[serde(default = "default_reference_alpha")]
    pub reference_alpha: u8,
}

fn default_radius() -> u32 {
    9
}

fn default_overlay_alpha() -> u8 {
    150
}

fn default_reference_alpha() -> u8 {
    255
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            roi: RegionOfInterest::default(),
            radius: default_radius(),
            overlay_alpha: default_overlay_alpha(),
            reference_alpha: default_reference_alpha(),
        }
    }
}

impl PipelineConfig {
    /// Configuration for synthetic rasters: custom palette, no cropping.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            palette,
            roi: RegionOfInterest::full(),
            ..Self::default()
        }
    }
}
