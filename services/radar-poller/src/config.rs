//! Poller configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or no file at all) gives the stock two-feed setup. A few settings can
//! be overridden from the environment.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use radar_common::PipelineConfig;
use serde::Deserialize;
use tracing::{debug, info};

pub const ENV_IMAGES_ROOT: &str = "RADAR_IMAGES_ROOT";
pub const ENV_VIZ_ROOT: &str = "RADAR_VIZ_ROOT";
pub const ENV_POLL_INTERVAL: &str = "RADAR_POLL_INTERVAL_SECS";

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding one subdirectory of captures per feed.
    #[serde(default = "default_images_root")]
    pub images_root: PathBuf,

    /// Directory holding `tiles/` and `tiles.json`.
    #[serde(default = "default_viz_root")]
    pub viz_root: PathBuf,

    /// Seconds between poll cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// HTTP request timeout. Unset means no timeout.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Replace `:` in capture filenames. Defaults to on for Windows.
    #[serde(default = "default_restricted_filenames")]
    pub restricted_filenames: bool,

    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,

    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// One polled capture source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    pub id: String,
    pub url: String,
    /// Subdirectory of `images_root`; defaults to the feed id.
    #[serde(default)]
    pub dir: Option<String>,
    /// Restore a tile from every capture and refresh the manifest.
    #[serde(default)]
    pub tile: bool,
}

impl FeedConfig {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            dir: None,
            tile: false,
        }
    }

    pub fn dir(&self) -> &str {
        self.dir.as_deref().unwrap_or(&self.id)
    }
}

fn default_images_root() -> PathBuf {
    PathBuf::from("images")
}

fn default_viz_root() -> PathBuf {
    PathBuf::from("viz")
}

fn default_poll_interval() -> u64 {
    10 * 60
}

fn default_restricted_filenames() -> bool {
    cfg!(windows)
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("vnukovo", "http://www.meteorad.ru/data/UVKVnukovo.png"),
        FeedConfig::new("profsouz", "http://www.meteorad.ru/data/UVKProfsoyuz.png"),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            images_root: default_images_root(),
            viz_root: default_viz_root(),
            poll_interval_secs: default_poll_interval(),
            request_timeout_secs: None,
            restricted_filenames: default_restricted_filenames(),
            feeds: default_feeds(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), feeds = config.feeds.len(), "Loaded config");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as null
        let config: AppConfig = if content.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => {
                info!("No config file given, using defaults");
                Self::default()
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup(ENV_IMAGES_ROOT) {
            self.images_root = PathBuf::from(root);
        }
        if let Some(root) = lookup(ENV_VIZ_ROOT) {
            self.viz_root = PathBuf::from(root);
        }
        if let Some(secs) = lookup(ENV_POLL_INTERVAL) {
            self.poll_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_POLL_INTERVAL, secs))?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be positive");
        }
        let mut seen = HashSet::new();
        for feed in &self.feeds {
            if !seen.insert(feed.id.as_str()) {
                bail!("Duplicate feed id: {}", feed.id);
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn feed(&self, id: &str) -> Option<&FeedConfig> {
        self.feeds.iter().find(|f| f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.poll_interval(), Duration::from_secs(600));
        assert_eq!(config.images_root, PathBuf::from("images"));
        assert_eq!(config.feeds.len(), 2);
        assert_eq!(config.feed("profsouz").unwrap().dir(), "profsouz");
        assert!(config.request_timeout().is_none());
        assert_eq!(config.pipeline.radius, 9);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = AppConfig::from_yaml("").unwrap();
        assert_eq!(config.feeds, AppConfig::default().feeds);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
images_root: /data/images
viz_root: /data/viz
poll_interval_secs: 300
request_timeout_secs: 30
restricted_filenames: true

feeds:
  - id: vnukovo
    url: "http://www.meteorad.ru/data/UVKVnukovo.png"
    tile: true
  - id: profsouz
    url: "http://www.meteorad.ru/data/UVKProfsoyuz.png"
    dir: profsoyuz

pipeline:
  radius: 5
  roi:
    top: 55
    bottom: 22
    left: 277
    right: 578
    source_size: [1000, 700]
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.viz_root, PathBuf::from("/data/viz"));
        assert_eq!(config.poll_interval_secs, 300);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.restricted_filenames);
        assert!(config.feed("vnukovo").unwrap().tile);
        assert_eq!(config.feed("profsouz").unwrap().dir(), "profsoyuz");
        assert_eq!(config.pipeline.radius, 5);
        assert_eq!(config.pipeline.roi.source_size, Some((1000, 700)));
        assert_eq!(config.pipeline.overlay_alpha, 150);
    }

    #[test]
    fn test_load_shipped_config() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/radar.yaml");
        let config = AppConfig::load(&path).unwrap();

        assert_eq!(config.feeds, {
            let mut feeds = default_feeds();
            feeds[0].tile = true;
            feeds
        });
        assert_eq!(config.pipeline, PipelineConfig::default());
    }

    #[test]
    fn test_duplicate_feed_rejected() {
        let yaml = r#"
feeds:
  - id: a
    url: "http://example.com/a.png"
  - id: a
    url: "http://example.com/b.png"
"#;
        let err = AppConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate feed id"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_VIZ_ROOT, "/srv/viz"),
            (ENV_POLL_INTERVAL, "60"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.viz_root, PathBuf::from("/srv/viz"));
        assert_eq!(config.images_root, PathBuf::from("images"));
        assert_eq!(config.poll_interval_secs, 60);
    }

    #[test]
    fn test_invalid_interval_override() {
        let mut config = AppConfig::default();
        assert!(config
            .apply_overrides(|key| (key == ENV_POLL_INTERVAL).then(|| "soon".to_string()))
            .is_err());
        assert!(config
            .apply_overrides(|key| (key == ENV_POLL_INTERVAL).then(|| "0".to_string()))
            .is_err());
    }
}
