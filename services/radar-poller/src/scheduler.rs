//! Poll scheduler.
//!
//! Every cycle downloads one capture per feed, in configuration order. Feeds
//! marked for tiling are restored into tiles right away and the manifest is
//! refreshed. A failing feed is logged and the cycle carries on.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::config::{AppConfig, FeedConfig};
use crate::download::Fetch;
use crate::layout::Layout;
use crate::manifest::dump_tiles_list;
use crate::tiling::make_tiles;

/// Waits between cycles.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Source of capture timestamps.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Results of one poll cycle.
#[derive(Debug, Default)]
pub struct CycleReport {
    /// Captures stored this cycle.
    pub fetched: Vec<PathBuf>,
    /// Feeds whose download failed.
    pub failed: Vec<String>,
    pub tiles_written: usize,
    pub tiles_failed: usize,
}

pub struct Poller<F, S, C> {
    config: AppConfig,
    layout: Layout,
    fetcher: F,
    sleeper: S,
    clock: C,
}

impl<F: Fetch, S: Sleep, C: Clock> Poller<F, S, C> {
    pub fn new(config: AppConfig, fetcher: F, sleeper: S, clock: C) -> Self {
        let layout = Layout::from_config(&config);
        Self {
            config,
            layout,
            fetcher,
            sleeper,
            clock,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run one cycle over every feed.
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> CycleReport {
        let mut report = CycleReport::default();

        for feed in &self.config.feeds {
            match self.poll_feed(feed).await {
                Ok(path) => {
                    if feed.tile {
                        self.tile_capture(feed, &path, &mut report).await;
                    }
                    report.fetched.push(path);
                }
                Err(e) => {
                    error!(feed = %feed.id, url = %feed.url, error = %e, "Feed download failed");
                    report.failed.push(feed.id.clone());
                }
            }
        }

        info!(
            fetched = report.fetched.len(),
            failed = report.failed.len(),
            tiles = report.tiles_written,
            "Poll cycle complete"
        );
        report
    }

    async fn poll_feed(&self, feed: &FeedConfig) -> Result<PathBuf> {
        let path = self.layout.capture_path(feed, self.clock.now());
        info!(feed = %feed.id, url = %feed.url, path = %path.display(), "Fetching capture");

        self.fetcher
            .fetch(&feed.url, &path)
            .await
            .with_context(|| format!("Failed to fetch {}", feed.url))?;
        Ok(path)
    }

    async fn tile_capture(&self, feed: &FeedConfig, capture: &Path, report: &mut CycleReport) {
        let inputs = vec![capture.to_path_buf()];
        let tiles_dir = self.layout.tiles_dir();
        let manifest = self.layout.manifest_path();
        let pipeline = self.config.pipeline.clone();

        // Decoding and gap filling are CPU bound
        let result = tokio::task::spawn_blocking(move || {
            let batch = make_tiles(&inputs, &tiles_dir, &pipeline);
            let entries = dump_tiles_list(&tiles_dir, &manifest);
            (batch, entries)
        })
        .await;

        match result {
            Ok((batch, entries)) => {
                report.tiles_written += batch.succeeded();
                report.tiles_failed += batch.failed_count();
                if let Err(e) = entries {
                    error!(feed = %feed.id, error = %e, "Manifest refresh failed");
                }
            }
            Err(e) => {
                error!(feed = %feed.id, error = %e, "Tiling task failed");
                report.tiles_failed += 1;
            }
        }
    }

    /// Poll until `shutdown` turns true or `max_cycles` cycles have run.
    ///
    /// Returns the number of completed cycles.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>, max_cycles: Option<u64>) -> u64 {
        let interval = self.config.poll_interval();
        let mut cycles = 0u64;

        info!(
            feeds = self.config.feeds.len(),
            interval_secs = interval.as_secs(),
            "Starting poll loop"
        );

        loop {
            if *shutdown.borrow() {
                info!("Shutting down poller");
                break;
            }

            self.poll_once().await;
            cycles += 1;

            if max_cycles.is_some_and(|max| cycles >= max) {
                info!(cycles, "Reached cycle limit");
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        warn!("Shutdown channel closed, stopping poller");
                        break;
                    }
                }
                _ = self.sleeper.sleep(interval) => {
                    // Next cycle
                }
            }
        }

        cycles
    }
}
