//! Event model and log parsing.
//!
//! This module handles:
//! - The typed event model (line, call, return, exception)
//! - Decoding/encoding events from/to the newline-delimited JSON wire format
//! - Reading event logs lazily from files or buffers

pub mod event_log;
pub mod schema;

// Re-export main types
pub use event_log::{
    decode_event, decode_event_with, encode_event, encode_event_line, parse_event_line,
    parse_events, parse_timestamp, read_events, read_events_from_path, EventReader, EventRegistry,
};
pub use schema::{elapsed_seconds, format_timestamp, Event, EventHeader, EventKind};
