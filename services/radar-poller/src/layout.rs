//! On-disk layout of captures, tiles and the manifest.
//!
//! ```text
//! images/<feed dir>/<timestamp>.png
//! viz/tiles/<capture filename>
//! viz/tiles.json
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use radar_common::{capture_timestamp, sanitize_timestamp};

use crate::config::{AppConfig, FeedConfig};

const TILES_DIR: &str = "tiles";
const MANIFEST_FILE: &str = "tiles.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    images_root: PathBuf,
    viz_root: PathBuf,
    restricted: bool,
}

impl Layout {
    pub fn new(images_root: impl Into<PathBuf>, viz_root: impl Into<PathBuf>) -> Self {
        Self {
            images_root: images_root.into(),
            viz_root: viz_root.into(),
            restricted: cfg!(windows),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.images_root.clone(), config.viz_root.clone())
            .with_restricted_filenames(config.restricted_filenames)
    }

    /// Replace `:` in capture filenames.
    pub fn with_restricted_filenames(mut self, restricted: bool) -> Self {
        self.restricted = restricted;
        self
    }

    pub fn feed_dir(&self, feed: &FeedConfig) -> PathBuf {
        self.images_root.join(feed.dir())
    }

    /// Where a capture of `feed` taken at local time `time` is stored.
    pub fn capture_path(&self, feed: &FeedConfig, time: NaiveDateTime) -> PathBuf {
        let name = sanitize_timestamp(&capture_timestamp(time), self.restricted);
        self.feed_dir(feed).join(format!("{}.png", name))
    }

    pub fn tiles_dir(&self) -> PathBuf {
        self.viz_root.join(TILES_DIR)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.viz_root.join(MANIFEST_FILE)
    }

    /// Tile path for a capture: same filename under the tiles directory.
    pub fn tile_path(&self, capture: &Path) -> Option<PathBuf> {
        capture.file_name().map(|name| self.tiles_dir().join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn capture_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2015, 7, 31)
            .unwrap()
            .and_hms_micro_opt(19, 0, 23, 506_671)
            .unwrap()
    }

    #[test]
    fn test_capture_path() {
        let layout = Layout::new("images", "viz").with_restricted_filenames(false);
        let feed = FeedConfig::new("vnukovo", "http://example.com/v.png");

        assert_eq!(
            layout.capture_path(&feed, capture_time()),
            PathBuf::from("images/vnukovo/2015-07-31T19:00:23.506671.png")
        );
    }

    #[test]
    fn test_restricted_capture_path() {
        let layout = Layout::new("images", "viz").with_restricted_filenames(true);
        let mut feed = FeedConfig::new("profsouz", "http://example.com/p.png");
        feed.dir = Some("profsoyuz".to_string());

        assert_eq!(
            layout.capture_path(&feed, capture_time()),
            PathBuf::from("images/profsoyuz/2015-07-31T19_00_23.506671.png")
        );
    }

    #[test]
    fn test_viz_paths() {
        let layout = Layout::new("images", "viz");
        assert_eq!(layout.manifest_path(), PathBuf::from("viz/tiles.json"));
        assert_eq!(
            layout.tile_path(Path::new("images/vnukovo/a.png")),
            Some(PathBuf::from("viz/tiles/a.png"))
        );
        assert_eq!(layout.tile_path(Path::new("/")), None);
    }
}
