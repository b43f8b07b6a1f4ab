//! Common types and utilities shared across the radar tile crates and services.

pub mod config;
pub mod error;
pub mod palette;
pub mod time;

pub use config::{PipelineConfig, RegionOfInterest};
pub use error::{RadarError, RadarResult};
pub use palette::{Category, Palette, Rgb, BACKGROUND};
pub use time::{capture_timestamp, minute_key, sanitize_timestamp};
