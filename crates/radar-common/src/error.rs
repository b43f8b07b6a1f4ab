//! Error types for radar tile processing.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Primary error type for raster processing and tile output.
#[derive(Debug, Error)]
pub enum RadarError {
    // === Input Errors ===
    #[error("Raster shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Failed to decode raster: {0}")]
    DecodeError(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // === Palette Errors ===
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),

    #[error("Category not found: {0}")]
    UnknownCategory(String),

    // === Pipeline Errors ===
    /// A pixel with zero local density for every category after smoothing.
    #[error("No candidate category for unknown pixel at ({x}, {y})")]
    NoCandidateCategory { x: u32, y: u32 },

    // === Output Errors ===
    #[error("Encoding failed: {0}")]
    EncodeError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RadarError {
    /// Whether the error signals a broken invariant rather than bad input or I/O.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RadarError::NoCandidateCategory { .. })
    }

    pub fn shape_mismatch(expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> Self {
        RadarError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<serde_json::Error> for RadarError {
    fn from(err: serde_json::Error) -> Self {
        RadarError::EncodeError(format!("JSON error: {}", err))
    }
}
