//! Meteorad radar poller library.
//!
//! Periodically downloads the public radar captures, restores labelled tiles
//! from them and keeps the minute-indexed tile manifest used by the viewer.

pub mod batch;
pub mod commands;
pub mod config;
pub mod download;
pub mod layout;
pub mod manifest;
pub mod scheduler;
pub mod tiling;

pub use config::{AppConfig, FeedConfig};
pub use download::{Fetch, HttpFetcher};
pub use layout::Layout;
pub use scheduler::{Clock, CycleReport, LocalClock, Poller, Sleep, TokioSleep};
pub use tiling::{make_tiles, TileBatchReport};
