//! Wire codec and reader for newline-delimited JSON event logs.
//!
//! Decoding dispatches on the record's `type` tag through an explicit
//! [`EventRegistry`] lookup table. Encoding is the exact inverse for records
//! produced by the writer: call records always carry `args` and return
//! records always carry `retval` (as `null` when absent).

use super::schema::{Event, EventHeader, EventKind, WireEvent};
use crate::utils::config::{
    FIELD_ARGS, FIELD_FILE_NAME, FIELD_FUNCTION_NAME, FIELD_LINE_NUMBER, FIELD_RETVAL,
    FIELD_TIMESTAMP, FIELD_TYPE, MAX_FRACTION_DIGITS, TIME_PARSE_FORMATS,
};
use crate::utils::error::DecodeError;
use chrono::NaiveDateTime;
use log::debug;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

type Record = Map<String, Value>;

/// Decoder for one event kind
pub type DecodeFn = fn(&Record) -> Result<Event, DecodeError>;

/// Lookup table from wire `type` tag to the decoder for that kind
///
/// Built once and passed to [`decode_event_with`]; [`decode_event`] uses a
/// shared immutable copy of [`EventRegistry::standard`].
#[derive(Debug, Clone)]
pub struct EventRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl EventRegistry {
    /// Registry with no decoders (every tag is rejected)
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry covering the four standard kinds
    pub fn standard() -> Self {
        Self::empty()
            .with(EventKind::Line.tag(), decode_line)
            .with(EventKind::Call.tag(), decode_call)
            .with(EventKind::Return.tag(), decode_return)
            .with(EventKind::Exception.tag(), decode_exception)
    }

    /// Register (or replace) the decoder for a tag
    pub fn with(mut self, tag: &'static str, decoder: DecodeFn) -> Self {
        self.decoders.insert(tag, decoder);
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.decoders.contains_key(tag)
    }

    /// Decode a parsed JSON value by dispatching on its `type` tag
    pub fn decode(&self, value: &Value) -> Result<Event, DecodeError> {
        let record = value.as_object().ok_or(DecodeError::NotAnObject)?;
        let tag = match record.get(FIELD_TYPE) {
            Some(Value::String(tag)) => tag.as_str(),
            Some(Value::Null) | None => return Err(DecodeError::MissingType),
            Some(other) => return Err(DecodeError::UnknownType(other.to_string())),
        };

        let decoder = self
            .decoders
            .get(tag)
            .ok_or_else(|| DecodeError::UnknownType(tag.to_string()))?;
        decoder(record)
    }
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_registry() -> &'static EventRegistry {
    static REGISTRY: OnceLock<EventRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EventRegistry::standard)
}

/// Decode an event from its JSON value using the standard registry
pub fn decode_event(value: &Value) -> Result<Event, DecodeError> {
    standard_registry().decode(value)
}

/// Decode an event from its JSON value using a caller-supplied registry
pub fn decode_event_with(registry: &EventRegistry, value: &Value) -> Result<Event, DecodeError> {
    registry.decode(value)
}

/// Encode an event to its JSON value
pub fn encode_event(event: &Event) -> Value {
    // WireEvent only holds strings and integers, serialization cannot fail
    serde_json::to_value(WireEvent::from(event)).unwrap_or(Value::Null)
}

/// Encode an event as a single JSON line (no trailing newline)
pub fn encode_event_line(event: &Event) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireEvent::from(event))
}

/// Parse one log line into an event
pub fn parse_event_line(line: &str) -> Result<Event, DecodeError> {
    let value: Value = serde_json::from_str(line)?;
    decode_event(&value)
}

/// Parse a whole log held in memory, failing on the first bad record
pub fn parse_events(content: &str) -> Result<Vec<Event>, DecodeError> {
    read_events(content.as_bytes()).collect()
}

/// Lazily read events from a line-oriented source
///
/// Blank lines are skipped. Errors carry the 1-based line number.
pub fn read_events<R: BufRead>(reader: R) -> EventReader<R> {
    EventReader {
        lines: reader.lines(),
        line_number: 0,
    }
}

/// Open a log file and read all of its events
pub fn read_events_from_path(path: impl AsRef<Path>) -> Result<Vec<Event>, DecodeError> {
    let path = path.as_ref();
    debug!("Reading events from: {}", path.display());

    let file = File::open(path)?;
    let events = read_events(BufReader::new(file)).collect::<Result<Vec<_>, _>>()?;

    debug!("Read {} events", events.len());
    Ok(events)
}

/// One-pass iterator over the events of a log
pub struct EventReader<R> {
    lines: std::io::Lines<R>,
    line_number: usize,
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<Event, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;
            let line = match line {
                Ok(line) => line,
                Err(e) => return Some(Err(DecodeError::Io(e).at_line(self.line_number))),
            };
            if line.trim().is_empty() {
                continue;
            }
            let line_number = self.line_number;
            return Some(parse_event_line(&line).map_err(|e| e.at_line(line_number)));
        }
    }
}

/// Parse a wire timestamp
///
/// Fractions finer than microseconds are rejected, they would not survive encoding.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, DecodeError> {
    let fraction_digits = value
        .rsplit_once('.')
        .map_or(0, |(_, fraction)| fraction.len());
    if fraction_digits > MAX_FRACTION_DIGITS {
        return Err(DecodeError::InvalidTimestamp(value.to_string()));
    }

    TIME_PARSE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| DecodeError::InvalidTimestamp(value.to_string()))
}

fn decode_line(record: &Record) -> Result<Event, DecodeError> {
    Ok(Event::Line(decode_header(record, EventKind::Line)?))
}

fn decode_call(record: &Record) -> Result<Event, DecodeError> {
    Ok(Event::Call {
        header: decode_header(record, EventKind::Call)?,
        function_name: required_string(record, EventKind::Call, FIELD_FUNCTION_NAME)?,
        args: optional_string(record, FIELD_ARGS)?,
    })
}

fn decode_return(record: &Record) -> Result<Event, DecodeError> {
    Ok(Event::Return {
        header: decode_header(record, EventKind::Return)?,
        function_name: required_string(record, EventKind::Return, FIELD_FUNCTION_NAME)?,
        retval: optional_string(record, FIELD_RETVAL)?,
    })
}

fn decode_exception(record: &Record) -> Result<Event, DecodeError> {
    Ok(Event::Exception {
        header: decode_header(record, EventKind::Exception)?,
        function_name: required_string(record, EventKind::Exception, FIELD_FUNCTION_NAME)?,
    })
}

fn decode_header(record: &Record, kind: EventKind) -> Result<EventHeader, DecodeError> {
    let timestamp = parse_timestamp(&required_string(record, kind, FIELD_TIMESTAMP)?)?;
    let file_name = required_string(record, kind, FIELD_FILE_NAME)?;

    let line_number = match record.get(FIELD_LINE_NUMBER) {
        None | Some(Value::Null) => {
            return Err(DecodeError::MissingField {
                kind: kind.tag(),
                field: FIELD_LINE_NUMBER,
            })
        }
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| DecodeError::InvalidField {
                field: FIELD_LINE_NUMBER,
                reason: format!("expected a non-negative integer, found {}", value),
            })?,
    };

    Ok(EventHeader {
        timestamp,
        file_name,
        line_number,
    })
}

fn required_string(
    record: &Record,
    kind: EventKind,
    field: &'static str,
) -> Result<String, DecodeError> {
    match record.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        None | Some(Value::Null) => Err(DecodeError::MissingField {
            kind: kind.tag(),
            field,
        }),
        Some(other) => Err(DecodeError::InvalidField {
            field,
            reason: format!("expected a string, found {}", other),
        }),
    }
}

fn optional_string(record: &Record, field: &'static str) -> Result<Option<String>, DecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::InvalidField {
            field,
            reason: format!("expected a string or null, found {}", other),
        }),
    }
}
