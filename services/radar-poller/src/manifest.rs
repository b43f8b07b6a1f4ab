//! Tile manifest for the web viewer.
//!
//! `tiles.json` maps each `YYYY-MM-DDThh:mm` key to a tile path relative to
//! the manifest's directory, e.g. `"2015-07-31T19:00": "tiles/2015-07-31T19:00:23.506671.png"`.

use std::collections::BTreeMap;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use radar_common::minute_key;
use radar_tiles::io::write_atomic;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

/// Index the tiles in `tiles_dir`.
///
/// Files without a minute timestamp in their name are skipped. When several
/// tiles share a minute, the lexicographically last filename wins.
pub fn collect_tiles(tiles_dir: &Path, prefix: &str) -> Result<BTreeMap<String, String>> {
    let mut tiles = BTreeMap::new();

    for entry in WalkDir::new(tiles_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", tiles_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        match minute_key(name) {
            Some(key) => {
                tiles.insert(key, join_url(prefix, name));
            }
            None => debug!(file = %name, "Skipping file without timestamp"),
        }
    }

    Ok(tiles)
}

/// Write the manifest for `tiles_dir` to `output`. Returns the entry count.
#[instrument(fields(tiles_dir = %tiles_dir.display(), output = %output.display()))]
pub fn dump_tiles_list(tiles_dir: &Path, output: &Path) -> Result<usize> {
    let prefix = relative_prefix(tiles_dir, output);
    let tiles = collect_tiles(tiles_dir, &prefix)?;

    let json = serde_json::to_vec(&tiles).context("Failed to serialize manifest")?;
    write_atomic(output, &json)
        .with_context(|| format!("Failed to write manifest {}", output.display()))?;

    info!(entries = tiles.len(), "Wrote tile manifest");
    Ok(tiles.len())
}

/// `tiles_dir` relative to the manifest's directory, `/`-separated.
fn relative_prefix(tiles_dir: &Path, output: &Path) -> String {
    let base = output.parent().unwrap_or_else(|| Path::new(""));
    let relative = tiles_dir.strip_prefix(base).unwrap_or(tiles_dir);

    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    parts.join("/")
}

fn join_url(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}
