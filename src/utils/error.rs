//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while decoding events from the wire format
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON deserialization failed: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Event record is not a JSON object")]
    NotAnObject,

    #[error("Event record has no \"type\" tag")]
    MissingType,

    #[error("Unknown event type: {0}")]
    UnknownType(String),

    #[error("Missing required field \"{field}\" for {kind} event")]
    MissingField { kind: &'static str, field: &'static str },

    #[error("Invalid value for field \"{field}\": {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Failed to read event log: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl DecodeError {
    /// Attach the 1-based log line number to an error
    pub fn at_line(self, line: usize) -> Self {
        DecodeError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// Errors that can occur while reconstructing a call tree or call graph
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("{kind} event at index {index} has no open call frame")]
    StackUnderflow { index: usize, kind: &'static str },
}

/// Errors that can occur during flame chart projection
#[derive(Error, Debug)]
pub enum FlameChartError {
    #[error("Trace contains no top-level calls")]
    EmptyTrace,
}

/// Errors that can occur while driving a replay
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Invalid location \"{0}\", expected FILE:LINE")]
    InvalidLocation(String),

    #[error("Unknown replay operation: {0}")]
    UnknownOperation(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
