//! Scratch directories and placeholder files.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Fresh directory, removed when the handle drops.
pub fn temp_test_dir() -> TempDir {
    temp_test_dir_with_prefix("radar-test")
}

pub fn temp_test_dir_with_prefix(prefix: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create scratch directory")
}

/// Create `dir` and an empty file in it for each name, e.g. to stand in for
/// captures whose content a test never decodes.
pub fn touch_files(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    std::fs::create_dir_all(dir).expect("Failed to create fixture directory");
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").expect("Failed to create fixture file");
            path
        })
        .collect()
}
