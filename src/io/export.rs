//! Write the active chart configuration as JSON.
//!
//! The layout follows Chart.js (see `render::config`); gradient paints are written
//! as `{"top", "bottom"}` stop pairs.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::render::ChartConfig;

/// Write a chart configuration JSON file (pretty-printed).
pub fn write_chart_json(path: &Path, chart: &ChartConfig) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create chart JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::new(2, format!("Failed to write chart JSON: {e}")))?;

    tracing::info!(path = %path.display(), "chart configuration exported");
    Ok(())
}
