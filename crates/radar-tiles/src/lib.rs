//! Restoration of labelled radar tiles from meteorad captures.
//!
//! A capture goes through these stages:
//! - Region extraction (crop the legend and border chrome)
//! - Mask splitting (exact palette colour match per category)
//! - Coverage shaping (everything outside the scan disk is background)
//! - Gap filling (unknown pixels take the locally densest category)
//! - Compositing (opaque RGB or semi-transparent RGBA overlay)

pub mod animation;
pub mod compose;
pub mod coverage;
pub mod gap_fill;
pub mod io;
pub mod mask;
pub mod overlay;
pub mod pipeline;
pub mod png;
pub mod reference;
pub mod region;

pub use compose::{join_split, Composite, CompositeMode};
pub use mask::{split_colors, Mask, MaskSet};
pub use pipeline::{make_tile, restore, Restoration, TileSummary};
