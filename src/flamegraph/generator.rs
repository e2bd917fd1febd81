//! Time-scaled flame chart projection of a call tree.
//!
//! The chart is a flat list of call records, each placed on a time axis
//! measured in seconds since the first top-level call. It is served verbatim
//! to a visualization front end.
//!
//! Ids are handed out during a single pre-order walk bounded by `max_depth`,
//! so frames below the cut consume no ids.

use crate::aggregator::call_tree::{ExecutionTree, FunctionCall};
use crate::parser::schema::{elapsed_seconds, format_timestamp};
use crate::utils::config::DEFAULT_FLAME_DEPTH;
use crate::utils::error::FlameChartError;
use chrono::NaiveDateTime;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Flame chart configuration
#[derive(Debug, Clone)]
pub struct FlameChartConfig {
    /// Deepest level emitted (0 = top-level calls only)
    pub max_depth: usize,
}

impl Default for FlameChartConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_FLAME_DEPTH,
        }
    }
}

impl FlameChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// One emitted call record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlameCall {
    pub id: u64,
    pub depth: usize,
    pub parent_id: Option<u64>,
    /// Seconds since the chart's start time
    pub call_time: f64,
    /// Seconds since the chart's start time
    pub ret_time: f64,
    pub name: String,
    pub args: Option<String>,
    pub retval: Option<String>,
}

/// Flame chart document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlameChart {
    pub start_time: String,
    pub total_seconds: f64,
    pub calls: Vec<FlameCall>,
}

/// Walk state shared across the whole projection
struct Projection {
    start: NaiveDateTime,
    max_depth: usize,
    next_id: u64,
    omitted: usize,
    calls: Vec<FlameCall>,
}

impl Projection {
    fn new(start: NaiveDateTime, max_depth: usize) -> Self {
        Self {
            start,
            max_depth,
            next_id: 1,
            omitted: 0,
            calls: Vec::new(),
        }
    }

    fn visit(&mut self, call: &FunctionCall, depth: usize, parent_id: Option<u64>) {
        let id = self.next_id;
        self.next_id += 1;

        match &call.return_event {
            Some(ret) => self.calls.push(FlameCall {
                id,
                depth,
                parent_id,
                call_time: elapsed_seconds(self.start, call.call_event.timestamp()),
                ret_time: elapsed_seconds(self.start, ret.timestamp()),
                name: call.name().to_string(),
                args: call.call_event.args().map(str::to_string),
                retval: ret.retval().map(str::to_string),
            }),
            None => self.omitted += 1,
        }

        if depth < self.max_depth {
            for sub_call in &call.sub_calls {
                self.visit(sub_call, depth + 1, Some(id));
            }
        }
    }
}

/// Project a whole execution tree onto a flame chart
///
/// **Public** - main entry point for flame chart generation
///
/// # Arguments
/// * `tree` - Call tree built from the event log
/// * `config` - Depth limit (defaults to `DEFAULT_FLAME_DEPTH`)
///
/// # Returns
/// Chart anchored at the first top-level call. `total_seconds` runs to the
/// return of the last terminated top-level call (0.0 if none terminated).
///
/// # Errors
/// * `FlameChartError::EmptyTrace` - the tree has no calls
pub fn build_flame_chart(
    tree: &ExecutionTree,
    config: Option<&FlameChartConfig>,
) -> Result<FlameChart, FlameChartError> {
    let first = tree.calls.first().ok_or(FlameChartError::EmptyTrace)?;
    let config = config.cloned().unwrap_or_default();
    let start = first.call_event.timestamp();

    let total_seconds = tree
        .calls
        .iter()
        .rev()
        .find_map(|call| call.return_event.as_ref())
        .map(|ret| elapsed_seconds(start, ret.timestamp()))
        .unwrap_or(0.0);

    let mut projection = Projection::new(start, config.max_depth);
    for call in &tree.calls {
        projection.visit(call, 0, None);
    }

    Ok(finish(projection, total_seconds))
}

/// Project a single call and its descendants, anchored at its own call time
///
/// The call is emitted at depth 0 with no parent.
pub fn build_call_flame_chart(call: &FunctionCall, config: Option<&FlameChartConfig>) -> FlameChart {
    let config = config.cloned().unwrap_or_default();
    let start = call.call_event.timestamp();
    let total_seconds = call.duration_seconds().unwrap_or(0.0);

    let mut projection = Projection::new(start, config.max_depth);
    projection.visit(call, 0, None);

    finish(projection, total_seconds)
}

fn finish(projection: Projection, total_seconds: f64) -> FlameChart {
    if projection.omitted > 0 {
        warn!(
            "Omitted {} unterminated calls from flame chart",
            projection.omitted
        );
    }
    debug!(
        "Flame chart: {} calls over {:.6}s (max depth {})",
        projection.calls.len(),
        total_seconds,
        projection.max_depth
    );

    FlameChart {
        start_time: format_timestamp(&projection.start),
        total_seconds,
        calls: projection.calls,
    }
}
