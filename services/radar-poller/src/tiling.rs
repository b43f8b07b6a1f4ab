//! Tile batches.

use std::path::{Path, PathBuf};

use radar_common::PipelineConfig;
use radar_tiles::{make_tile, TileSummary};
use tracing::{error, info, instrument};

/// Outcome of a tile batch.
#[derive(Debug, Default)]
pub struct TileBatchReport {
    /// Tiles written, in input order.
    pub written: Vec<(PathBuf, TileSummary)>,
    /// Inputs that failed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl TileBatchReport {
    pub fn succeeded(&self) -> usize {
        self.written.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Restore a tile for every input into `tiles_dir`, keeping the filename.
///
/// A failing input is logged and recorded; the rest of the batch still runs.
#[instrument(skip(inputs, config), fields(inputs = inputs.len(), tiles_dir = %tiles_dir.display()))]
pub fn make_tiles(inputs: &[PathBuf], tiles_dir: &Path, config: &PipelineConfig) -> TileBatchReport {
    let mut report = TileBatchReport::default();

    for input in inputs {
        info!(input = %input.display(), "Making tile");

        let Some(name) = input.file_name() else {
            error!(input = %input.display(), "Input has no filename");
            report
                .failed
                .push((input.clone(), "input has no filename".to_string()));
            continue;
        };
        let output = tiles_dir.join(name);

        match make_tile(input, &output, config) {
            Ok(summary) => report.written.push((output, summary)),
            Err(e) => {
                error!(input = %input.display(), error = %e, "Tile failed");
                report.failed.push((input.clone(), e.to_string()));
            }
        }
    }

    info!(
        written = report.succeeded(),
        failed = report.failed_count(),
        "Tile batch complete"
    );
    report
}
