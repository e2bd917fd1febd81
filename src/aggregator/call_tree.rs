//! Build a nested call tree from a flat event sequence.
//!
//! Each call event opens a frame, each return/exception event closes the
//! innermost open frame. Line events do not appear in the tree.
//!
//! Example: `main` calling `parse` then `render` becomes
//! `main -> [parse, render]`, each node holding its call and return events.

use crate::parser::schema::{elapsed_seconds, Event};
use crate::utils::config::UnderflowPolicy;
use crate::utils::error::TreeError;
use log::{debug, warn};
use serde::Serialize;

/// One invocation of a function, bounded by its call and return/exception events
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The event that opened this frame
    pub call_event: Event,

    /// Calls made directly from this frame, in order
    pub sub_calls: Vec<FunctionCall>,

    /// The return or exception event that closed this frame (None while open)
    pub return_event: Option<Event>,
}

impl FunctionCall {
    pub fn new(call_event: Event) -> Self {
        Self {
            call_event,
            sub_calls: Vec::new(),
            return_event: None,
        }
    }

    /// Name of the called function
    pub fn name(&self) -> &str {
        self.call_event.function_name().unwrap_or_default()
    }

    /// True when both the call and the closing event are present
    pub fn is_complete(&self) -> bool {
        self.return_event.is_some()
    }

    /// Wall time spent in this call, if it was closed
    pub fn duration_seconds(&self) -> Option<f64> {
        self.return_event
            .as_ref()
            .map(|ret| elapsed_seconds(self.call_event.timestamp(), ret.timestamp()))
    }

    /// Depth of the deepest descendant (0 for a leaf)
    pub fn max_depth(&self) -> usize {
        self.sub_calls
            .iter()
            .map(|call| call.max_depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Serializable view, descending at most `max_depth` levels
    ///
    /// `Some(0)` emits no sub-calls, `Some(1)` one level, `None` the full subtree.
    pub fn to_data(&self, max_depth: Option<usize>) -> CallNode<'_> {
        let sub_events = match max_depth {
            Some(0) => Vec::new(),
            _ => {
                let child_depth = max_depth.map(|d| d - 1);
                self.sub_calls
                    .iter()
                    .map(|call| call.to_data(child_depth))
                    .collect()
            }
        };

        CallNode {
            call_event: &self.call_event,
            sub_events,
            return_event: self.return_event.as_ref(),
        }
    }
}

/// Serialized form of a [`FunctionCall`]
#[derive(Debug, Clone, Serialize)]
pub struct CallNode<'a> {
    pub call_event: &'a Event,
    pub sub_events: Vec<CallNode<'a>>,
    pub return_event: Option<&'a Event>,
}

/// Full nested-call reconstruction of a trace
///
/// The synthetic root is implicit: `calls` holds the depth-0 invocations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionTree {
    pub calls: Vec<FunctionCall>,
}

impl ExecutionTree {
    /// Build a tree, ignoring returns that have no open call
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        match Self::from_events_with_policy(events, UnderflowPolicy::Ignore) {
            Ok(tree) => tree,
            // Ignore never reports an underflow
            Err(_) => Self::default(),
        }
    }

    /// Build a tree with an explicit stack underflow policy
    ///
    /// # Algorithm
    /// 1. Keep a stack of open frames, the root collecting depth-0 calls
    /// 2. A call pushes a new frame
    /// 3. A return/exception closes the top frame and attaches it to its parent
    /// 4. Frames still open at the end are attached unterminated
    pub fn from_events_with_policy<'a, I>(
        events: I,
        policy: UnderflowPolicy,
    ) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut tree = ExecutionTree::default();
        let mut open: Vec<FunctionCall> = Vec::new();
        let mut event_count = 0usize;

        for (index, event) in events.into_iter().enumerate() {
            event_count += 1;
            let change = event.stack_change();

            if change > 0 {
                open.push(FunctionCall::new(event.clone()));
            } else if change < 0 {
                match open.pop() {
                    Some(mut frame) => {
                        frame.return_event = Some(event.clone());
                        tree.attach(&mut open, frame);
                    }
                    None => match policy {
                        UnderflowPolicy::Ignore => {
                            warn!(
                                "Ignoring {} event at index {} with no open call",
                                event.kind(),
                                index
                            );
                        }
                        UnderflowPolicy::Fail => {
                            return Err(TreeError::StackUnderflow {
                                index,
                                kind: event.kind().tag(),
                            });
                        }
                    },
                }
            }
        }

        if !open.is_empty() {
            debug!("{} calls still open at end of trace", open.len());
        }
        while let Some(frame) = open.pop() {
            tree.attach(&mut open, frame);
        }

        debug!(
            "Built execution tree: {} top-level calls from {} events",
            tree.calls.len(),
            event_count
        );

        Ok(tree)
    }

    fn attach(&mut self, open: &mut [FunctionCall], frame: FunctionCall) {
        match open.last_mut() {
            Some(parent) => parent.sub_calls.push(frame),
            None => self.calls.push(frame),
        }
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Depth of the deepest call (0 when only top-level calls exist)
    pub fn max_depth(&self) -> usize {
        self.calls.iter().map(FunctionCall::max_depth).max().unwrap_or(0)
    }

    /// Serializable view of all top-level calls, see [`FunctionCall::to_data`]
    pub fn to_data(&self, max_depth: Option<usize>) -> Vec<CallNode<'_>> {
        self.calls.iter().map(|call| call.to_data(max_depth)).collect()
    }
}
