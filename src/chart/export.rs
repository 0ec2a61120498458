//! Read/write chart JSON files.
//!
//! A chart JSON is the portable form of a run's [`ChartRequest`]: title, axis
//! type, and every plotted series with its dates and values, so it can be
//! re-plotted by other tools without re-fitting.

use std::fs::File;
use std::path::Path;

use crate::chart::ChartRequest;
use crate::error::AppError;

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, chart: &ChartRequest) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::usage(format!("Failed to write chart JSON: {e}")))?;
    tracing::info!(path = %path.display(), "wrote chart JSON");
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartRequest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::usage(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::usage(format!("Invalid chart JSON: {e}")))
}
