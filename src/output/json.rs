//! JSON document output writer.
//!
//! Writes flame charts, call trees and call graphs to JSON files with proper formatting.

use super::prepare_output_path;
use crate::flamegraph::FlameChart;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write any serializable document to a pretty-printed JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `document` - Data to write (flame chart, tree view, function list)
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let chart = build_flame_chart(&tree, None)?;
/// write_json(&chart, "flame.json")?;
/// ```
pub fn write_json<T: Serialize + ?Sized>(
    document: &T,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing JSON to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, document).map_err(OutputError::SerializationFailed)?;

    info!(
        "JSON written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a document to a pretty JSON string (for stdout or tests)
pub fn to_json_string<T: Serialize + ?Sized>(document: &T) -> Result<String, OutputError> {
    serde_json::to_string_pretty(document).map_err(OutputError::SerializationFailed)
}

/// Read a flame chart back from a JSON file
///
/// **Public** - useful for validation and testing
pub fn read_flame_chart(input_path: impl AsRef<Path>) -> Result<FlameChart, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading flame chart from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let chart: FlameChart =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Flame chart loaded: {} calls, start {}",
        chart.calls.len(),
        chart.start_time
    );

    Ok(chart)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
