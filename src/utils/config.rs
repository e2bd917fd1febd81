//! Configuration and constants shared by the parser, builders and CLI.

/// Timestamp layout used on the wire (ISO-8601 with microseconds)
///
/// Example: `2015-01-20T14:30:32.001000`
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Layouts accepted on decode, tried in order.
/// The second covers writers that drop the fractional seconds.
pub const TIME_PARSE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Finest timestamp precision accepted on decode (microseconds)
pub const MAX_FRACTION_DIGITS: usize = 6;

/// Depth served to the flame chart front end when none is requested
pub const DEFAULT_FLAME_DEPTH: usize = 100;

/// Current output schema version for emitted JSON documents
pub const SCHEMA_VERSION: &str = "1.0.0";

// Wire field names
pub const FIELD_TYPE: &str = "type";
pub const FIELD_TIMESTAMP: &str = "timestamp";
pub const FIELD_FILE_NAME: &str = "file_name";
pub const FIELD_LINE_NUMBER: &str = "line_number";
pub const FIELD_FUNCTION_NAME: &str = "function_name";
pub const FIELD_ARGS: &str = "args";
pub const FIELD_RETVAL: &str = "retval";

/// What the tree and graph builders do with a return/exception event
/// that arrives while no call frame is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnderflowPolicy {
    /// Log a warning and drop the event (tolerates truncated traces)
    #[default]
    Ignore,
    /// Abort the build with `TreeError::StackUnderflow`
    Fail,
}
