//! Line-buffered NDJSON event log writer.
//!
//! The inverse of the log reader: one encoded event per line, flushed as
//! soon as it is written so a crashed producer still leaves a readable log.

use super::prepare_output_path;
use crate::parser::event_log::encode_event_line;
use crate::parser::schema::Event;
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes events to any byte sink, one JSON record per line
pub struct EventWriter<W: Write> {
    sink: W,
    written: usize,
}

impl<W: Write> EventWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, written: 0 }
    }

    /// Encode and write a single event, then flush
    pub fn log_event(&mut self, event: &Event) -> Result<(), OutputError> {
        let line = encode_event_line(event)?;
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        self.sink.flush()?;
        self.written += 1;
        Ok(())
    }

    pub fn log_events<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<(), OutputError> {
        events.into_iter().try_for_each(|event| self.log_event(event))
    }

    /// Number of events written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Write a whole event log to a file
pub fn write_events(events: &[Event], output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing {} events to: {}", events.len(), output_path.display());

    prepare_output_path(output_path)?;
    let file = File::create(output_path)?;

    let mut writer = EventWriter::new(file);
    writer.log_events(events)?;

    Ok(())
}
