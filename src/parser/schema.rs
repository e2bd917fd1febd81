//! Event model for execution logs.
//!
//! An execution log is a flat, time-ordered sequence of events. Each event
//! shares a header (timestamp and source location); function events also carry
//! the function name, and calls/returns carry opaque argument/return strings.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::utils::config::TIME_FORMAT;
use crate::utils::error::DecodeError;

/// Discriminant of an [`Event`], matching the wire `type` tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    Line,
    Call,
    Return,
    Exception,
}

impl EventKind {
    /// All kinds, in wire-tag order
    pub const ALL: [EventKind; 4] = [
        EventKind::Line,
        EventKind::Call,
        EventKind::Return,
        EventKind::Exception,
    ];

    /// Wire tag for this kind
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::Line => "line",
            EventKind::Call => "call",
            EventKind::Return => "return",
            EventKind::Exception => "exception",
        }
    }

    /// Call-depth delta implied by this kind
    pub fn stack_change(self) -> i32 {
        match self {
            EventKind::Call => 1,
            EventKind::Return | EventKind::Exception => -1,
            EventKind::Line => 0,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for EventKind {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| DecodeError::UnknownType(s.to_string()))
    }
}

/// Fields shared by every event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventHeader {
    pub timestamp: NaiveDateTime,
    pub file_name: String,
    pub line_number: u32,
}

impl EventHeader {
    pub fn new(timestamp: NaiveDateTime, file_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            timestamp,
            file_name: file_name.into(),
            line_number,
        }
    }
}

/// One timestamped occurrence in an execution trace
///
/// `stack_change` is not stored: it is always derived from the variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A source line was reached
    Line(EventHeader),

    /// A function was entered
    Call {
        header: EventHeader,
        function_name: String,
        args: Option<String>,
    },

    /// A function returned normally
    Return {
        header: EventHeader,
        function_name: String,
        retval: Option<String>,
    },

    /// An exception propagated out of a function frame
    Exception {
        header: EventHeader,
        function_name: String,
    },
}

impl Event {
    pub fn line(header: EventHeader) -> Self {
        Event::Line(header)
    }

    pub fn call(header: EventHeader, function_name: impl Into<String>, args: Option<String>) -> Self {
        Event::Call {
            header,
            function_name: function_name.into(),
            args,
        }
    }

    pub fn ret(header: EventHeader, function_name: impl Into<String>, retval: Option<String>) -> Self {
        Event::Return {
            header,
            function_name: function_name.into(),
            retval,
        }
    }

    pub fn exception(header: EventHeader, function_name: impl Into<String>) -> Self {
        Event::Exception {
            header,
            function_name: function_name.into(),
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Line(_) => EventKind::Line,
            Event::Call { .. } => EventKind::Call,
            Event::Return { .. } => EventKind::Return,
            Event::Exception { .. } => EventKind::Exception,
        }
    }

    /// Call-depth delta: call=+1, return/exception=-1, line=0
    pub fn stack_change(&self) -> i32 {
        self.kind().stack_change()
    }

    pub fn header(&self) -> &EventHeader {
        match self {
            Event::Line(header)
            | Event::Call { header, .. }
            | Event::Return { header, .. }
            | Event::Exception { header, .. } => header,
        }
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.header().timestamp
    }

    pub fn file_name(&self) -> &str {
        &self.header().file_name
    }

    pub fn line_number(&self) -> u32 {
        self.header().line_number
    }

    /// Function name, absent for line events
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Event::Line(_) => None,
            Event::Call { function_name, .. }
            | Event::Return { function_name, .. }
            | Event::Exception { function_name, .. } => Some(function_name),
        }
    }

    pub fn args(&self) -> Option<&str> {
        match self {
            Event::Call { args, .. } => args.as_deref(),
            _ => None,
        }
    }

    pub fn retval(&self) -> Option<&str> {
        match self {
            Event::Return { retval, .. } => retval.as_deref(),
            _ => None,
        }
    }
}

/// Borrowed wire representation used for encoding
///
/// `args`/`retval` are doubly optional: the outer `None` omits the key,
/// `Some(None)` emits an explicit `null`.
#[derive(Debug, Serialize)]
pub(crate) struct WireEvent<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: String,
    pub file_name: &'a str,
    pub line_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Option<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retval: Option<Option<&'a str>>,
}

impl<'a> From<&'a Event> for WireEvent<'a> {
    fn from(event: &'a Event) -> Self {
        let header = event.header();
        WireEvent {
            kind: event.kind().tag(),
            timestamp: format_timestamp(&header.timestamp),
            file_name: &header.file_name,
            line_number: header.line_number,
            function_name: event.function_name(),
            args: match event {
                Event::Call { args, .. } => Some(args.as_deref()),
                _ => None,
            },
            retval: match event {
                Event::Return { retval, .. } => Some(retval.as_deref()),
                _ => None,
            },
        }
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        WireEvent::from(self).serialize(serializer)
    }
}

/// Format a timestamp in the wire layout (always six fractional digits)
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIME_FORMAT).to_string()
}

/// Fractional seconds elapsed from `start` to `end` (negative if `end` is earlier)
pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        // Only reachable for spans of several hundred thousand years
        None => delta.num_milliseconds() as f64 / 1_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn header() -> EventHeader {
        let ts = NaiveDate::from_ymd_opt(1989, 3, 11)
            .unwrap()
            .and_hms_micro_opt(13, 30, 1, 234_567)
            .unwrap();
        EventHeader::new(ts, "my_file.py", 7)
    }

    #[test]
    fn test_stack_change_follows_kind() {
        assert_eq!(Event::line(header()).stack_change(), 0);
        assert_eq!(Event::call(header(), "f", None).stack_change(), 1);
        assert_eq!(Event::ret(header(), "f", None).stack_change(), -1);
        assert_eq!(Event::exception(header(), "f").stack_change(), -1);
    }

    #[test]
    fn test_kind_tags_parse_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.tag().parse::<EventKind>().unwrap(), kind);
        }
        assert!("function".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_accessors() {
        let call = Event::call(header(), "some_func", Some("x=1".to_string()));
        assert_eq!(call.function_name(), Some("some_func"));
        assert_eq!(call.args(), Some("x=1"));
        assert_eq!(call.retval(), None);
        assert_eq!(call.file_name(), "my_file.py");
        assert_eq!(call.line_number(), 7);

        let line = Event::line(header());
        assert_eq!(line.function_name(), None);
    }

    #[test]
    fn test_format_timestamp_keeps_microseconds() {
        assert_eq!(format_timestamp(&header().timestamp), "1989-03-11T13:30:01.234567");
    }

    #[test]
    fn test_elapsed_seconds() {
        let start = header().timestamp;
        let end = start + chrono::Duration::milliseconds(1_500);
        assert_eq!(elapsed_seconds(start, end), 1.5);
        assert_eq!(elapsed_seconds(end, start), -1.5);
    }
}
