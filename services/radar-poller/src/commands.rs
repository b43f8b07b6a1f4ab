//! One-shot operations behind the CLI subcommands.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use radar_common::PipelineConfig;
use radar_tiles::animation::{build_animation, AnimationSettings};
use radar_tiles::io::read_raster;
use radar_tiles::overlay::overlay_mask;
use radar_tiles::reference::write_reference_tile;
use radar_tiles::{restore, CompositeMode, Restoration};
use tracing::info;

use crate::batch::select_range;
use crate::config::AppConfig;
use crate::layout::Layout;
use crate::manifest::dump_tiles_list;
use crate::tiling::{make_tiles, TileBatchReport};

/// Tile the stored captures of one feed, optionally limited to a filename range.
pub fn tile_feed(
    config: &AppConfig,
    feed_id: &str,
    start: Option<&str>,
    stop: Option<&str>,
) -> Result<TileBatchReport> {
    let feed = config
        .feed(feed_id)
        .ok_or_else(|| anyhow!("Unknown feed: {}", feed_id))?;
    let layout = Layout::from_config(config);

    let inputs = select_range(&layout.feed_dir(feed), start, stop)?;
    info!(feed = %feed.id, count = inputs.len(), "Tiling stored captures");

    Ok(make_tiles(&inputs, &layout.tiles_dir(), &config.pipeline))
}

/// Rewrite the tile manifest.
pub fn refresh_manifest(config: &AppConfig) -> Result<usize> {
    let layout = Layout::from_config(config);
    dump_tiles_list(&layout.tiles_dir(), &layout.manifest_path())
}

fn restore_file(input: &Path, config: &PipelineConfig) -> Result<Restoration> {
    let raw = read_raster(input)?;
    restore(&raw, config).with_context(|| format!("Failed to restore {}", input.display()))
}

/// Write the reference tile of one category's restored mask.
pub fn reference(config: &PipelineConfig, input: &Path, category: &str, output: &Path) -> Result<()> {
    let restoration = restore_file(input, config)?;
    let mask = restoration.completed.get(category)?;

    write_reference_tile(mask, config.reference_alpha, output)?;
    info!(category, output = %output.display(), pixels = mask.count(), "Wrote reference tile");
    Ok(())
}

/// Fade one category in over the restored capture and write a GIF.
pub fn animate(
    config: &PipelineConfig,
    input: &Path,
    category: &str,
    output: &Path,
    settings: AnimationSettings,
) -> Result<PathBuf> {
    let restoration = restore_file(input, config)?;
    let image = restoration
        .composite(config, CompositeMode::Opaque)?
        .into_rgb()
        .ok_or_else(|| anyhow!("Opaque composite is not an RGB raster"))?;
    let mask = restoration.completed.get(category)?;

    build_animation(|alpha| overlay_mask(&image, mask, alpha), settings, output)?;
    Ok(output.to_path_buf())
}
