//! Raster decoding and atomic file output.

use std::io::Write;
use std::path::Path;

use image::RgbImage;
use radar_common::{RadarError, RadarResult};
use tracing::debug;

/// Decode an image file into RGB, dropping any alpha channel.
pub fn read_raster(path: &Path) -> RadarResult<RgbImage> {
    let image = image::open(path)
        .map_err(|e| RadarError::DecodeError(format!("{}: {}", path.display(), e)))?;
    Ok(image.to_rgb8())
}

/// Decode an in-memory image into RGB.
pub fn decode_raster(bytes: &[u8]) -> RadarResult<RgbImage> {
    let image =
        image::load_from_memory(bytes).map_err(|e| RadarError::DecodeError(e.to_string()))?;
    Ok(image.to_rgb8())
}

/// Write `bytes` to `path` through a temporary file in the same directory.
///
/// Readers see either the previous file or the complete new one. The
/// temporary file is removed if anything fails before the rename.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> RadarResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| RadarError::Io(e.error))?;

    debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}
