#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use execlog::parser::{parse_timestamp, Event, EventHeader};
use proptest::prelude::*;

pub fn ts(value: &str) -> NaiveDateTime {
    parse_timestamp(value).unwrap()
}

fn header(timestamp: &str, file: &str, line: u32) -> EventHeader {
    EventHeader::new(ts(timestamp), file, line)
}

/// main -> somefunc -> func3, then main -> someotherfunc, spanning exactly one day
pub fn sample_trace() -> Vec<Event> {
    vec![
        Event::call(header("2015-01-20T14:30:32.001000", "foo.py", 8), "main", None),
        Event::call(header("2015-01-20T14:30:33.001000", "bar.py", 22), "somefunc", None),
        Event::call(header("2015-01-20T14:30:34.501000", "baz.py", 27), "func3", None),
        Event::ret(header("2015-01-20T14:30:35.001000", "baz.py", 27), "func3", None),
        Event::ret(header("2015-01-20T15:30:32.001000", "bar.py", 22), "somefunc", None),
        Event::call(header("2015-01-20T16:30:32.001000", "bar.py", 50), "someotherfunc", None),
        Event::ret(header("2015-01-21T02:30:32.001000", "bar.py", 50), "someotherfunc", None),
        Event::ret(header("2015-01-21T14:30:32.001000", "foo.py", 8), "main", None),
    ]
}

/// The sample trace as an NDJSON log
pub fn sample_log() -> String {
    sample_trace()
        .iter()
        .map(|event| execlog::parser::encode_event_line(event).unwrap() + "\n")
        .collect()
}

fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 1, 20)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

const FUNCTIONS: [(&str, &str, u32); 4] = [
    ("main", "foo.py", 8),
    ("somefunc", "bar.py", 22),
    ("func3", "baz.py", 27),
    ("someotherfunc", "bar.py", 50),
];

/// Arbitrary event sequences over a small pool of functions, including
/// unbalanced returns and calls left open at the end
pub fn arb_trace() -> impl Strategy<Value = Vec<Event>> {
    prop::collection::vec((0u8..4, 0usize..FUNCTIONS.len(), 1u32..40), 0..60).prop_map(|steps| {
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (kind, function, line))| {
                let (name, file, def_line) = FUNCTIONS[function];
                let at = base_time() + Duration::milliseconds(i as i64 * 250);
                match kind {
                    0 => Event::line(EventHeader::new(at, file, line)),
                    1 => Event::call(EventHeader::new(at, file, def_line), name, None),
                    2 => Event::ret(EventHeader::new(at, file, line), name, Some(line.to_string())),
                    _ => Event::exception(EventHeader::new(at, file, line), name),
                }
            })
            .collect()
    })
}

/// Arbitrary single events with arbitrary optional payloads
pub fn arb_event() -> impl Strategy<Value = Event> {
    (
        0u8..4,
        0i64..1_000_000_000_000,
        "[a-z/_]{1,12}\\.py",
        any::<u32>(),
        "[a-zA-Z_][a-zA-Z0-9_]{0,12}",
        proptest::option::of("[ -~]{0,24}"),
    )
        .prop_map(|(kind, micros, file, line, name, payload)| {
            let header = EventHeader::new(base_time() + Duration::microseconds(micros), file, line);
            match kind {
                0 => Event::line(header),
                1 => Event::call(header, name, payload),
                2 => Event::ret(header, name, payload),
                _ => Event::exception(header, name),
            }
        })
}
