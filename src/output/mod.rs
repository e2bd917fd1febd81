//! Output writers for reconstructed views and event logs.
//!
//! This module handles writing data to disk in various formats:
//! - JSON documents (flame charts, call trees, call graphs)
//! - NDJSON event logs (line-buffered)
//! - Human-readable event listings
//! - Graphviz DOT call graphs

pub mod dot;
pub mod event_writer;
pub mod json;
pub mod text;

// Re-export main functions
pub use dot::function_set_to_dot;
pub use event_writer::{write_events, EventWriter};
pub use json::{read_flame_chart, to_json_string, write_json};
pub use text::{format_readable, write_readable};

use crate::utils::error::OutputError;
use log::debug;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Validate a path and create its parent directories if needed
pub(crate) fn prepare_output_path(path: &Path) -> Result<(), OutputError> {
    validate_path(path)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
