//! Selection of stored captures by filename range.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

/// Regular files directly inside `dir` whose names fall in `start..=stop`.
///
/// Bounds compare lexicographically against the bare filename, which orders
/// timestamped captures chronologically. Missing bounds are open. Results are
/// sorted by name.
pub fn select_range(dir: &Path, start: Option<&str>, stop: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut selected = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            debug!(path = %entry.path().display(), "Skipping non UTF-8 filename");
            continue;
        };

        let after_start = start.map_or(true, |s| s <= name);
        let before_stop = stop.map_or(true, |s| name <= s);
        if after_start && before_stop {
            selected.push(entry.into_path());
        }
    }

    debug!(dir = %dir.display(), count = selected.len(), "Selected captures");
    Ok(selected)
}
