//! Capture-to-tile pipeline.

use std::path::Path;

use image::RgbImage;
use radar_common::{PipelineConfig, RadarResult};
use tracing::{info, instrument};

use crate::compose::{join_split, Composite, CompositeMode};
use crate::coverage::expand_background;
use crate::gap_fill::{guess_unknown, unknown_mask};
use crate::io::{read_raster, write_atomic};
use crate::mask::{split_colors, Mask, MaskSet};
use crate::region::extract_roi;

/// Intermediate and final masks of one capture.
#[derive(Debug, Clone)]
pub struct Restoration {
    /// Exact-match masks, with the background already widened to the scan disk.
    pub split: MaskSet,
    /// Masks after gap filling; their union is the whole crop.
    pub completed: MaskSet,
    /// Pixels that matched no category before gap filling.
    pub unknown: Mask,
}

impl Restoration {
    pub fn composite(&self, config: &PipelineConfig, mode: CompositeMode) -> RadarResult<Composite> {
        join_split(&self.completed, &config.palette, mode, config.overlay_alpha)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.completed.dimensions()
    }
}

/// Run every pipeline stage up to compositing.
pub fn restore(raw: &RgbImage, config: &PipelineConfig) -> RadarResult<Restoration> {
    let roi = extract_roi(raw, &config.roi)?;

    let mut split = split_colors(&roi, &config.palette);
    let background = &config.palette.background().name;
    expand_background(split.get_mut(background)?);

    let unknown = unknown_mask(&split);
    let completed = guess_unknown(&split, config.radius)?;

    Ok(Restoration {
        split,
        completed,
        unknown,
    })
}

/// Outcome of writing one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileSummary {
    pub width: u32,
    pub height: u32,
    /// Pixels assigned by gap filling.
    pub unknown_pixels: usize,
}

/// Read a capture, restore it and write an overlay tile to `output`.
#[instrument(skip(config), fields(input = %input.display(), output = %output.display()))]
pub fn make_tile(input: &Path, output: &Path, config: &PipelineConfig) -> RadarResult<TileSummary> {
    let raw = read_raster(input)?;
    let restoration = restore(&raw, config)?;
    let png = restoration.composite(config, CompositeMode::Overlay)?.to_png()?;
    write_atomic(output, &png)?;

    let (width, height) = restoration.dimensions();
    let summary = TileSummary {
        width,
        height,
        unknown_pixels: restoration.unknown.count(),
    };
    info!(
        width,
        height,
        unknown = summary.unknown_pixels,
        bytes = png.len(),
        "Wrote tile"
    );
    Ok(summary)
}
