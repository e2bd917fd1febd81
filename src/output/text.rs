//! Human-readable event listing.
//!
//! Format: `{timestamp}\t{file}:{line}\t{type}\t{function}`

use crate::parser::schema::{format_timestamp, Event};
use std::io::{self, Write};

/// Render one event as a tab-separated line (no trailing newline)
pub fn format_readable(event: &Event) -> String {
    format!(
        "{}\t{}:{}\t{}\t{}",
        format_timestamp(&event.timestamp()),
        event.file_name(),
        event.line_number(),
        event.kind(),
        event.function_name().unwrap_or_default()
    )
}

/// Write every event as a readable line
pub fn write_readable<'a, W: Write>(
    out: &mut W,
    events: impl IntoIterator<Item = &'a Event>,
) -> io::Result<()> {
    for event in events {
        writeln!(out, "{}", format_readable(event))?;
    }
    Ok(())
}
