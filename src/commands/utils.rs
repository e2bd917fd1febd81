use crate::output::{to_json_string, write_json};
use crate::parser::{read_events_from_path, Event};
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::path::Path;

/// Load every event of a log, failing on the first bad record
pub fn load_events(log_path: &Path) -> Result<Vec<Event>> {
    let events = read_events_from_path(log_path)
        .with_context(|| format!("Failed to read event log {}", log_path.display()))?;
    info!("Loaded {} events from {}", events.len(), log_path.display());
    Ok(events)
}

/// Write a JSON document to a file, or pretty-print it to stdout
pub fn emit_json<T: Serialize + ?Sized>(document: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_json(document, path).context("Failed to write JSON output")?;
            info!("✓ Written to: {}", path.display());
        }
        None => println!("{}", to_json_string(document)?),
    }
    Ok(())
}

/// Write text to a file, or print it to stdout
pub fn emit_text(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            crate::output::validate_path(path)?;
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("✓ Written to: {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

/// Display version information
pub fn display_version() {
    println!("execlog v{}", env!("CARGO_PKG_VERSION"));
    println!("Output Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Reconstructs call trees, call graphs, flame charts and replays from execution logs.");
}
