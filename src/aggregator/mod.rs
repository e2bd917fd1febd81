//! Aggregation of event sequences into structured views.
//!
//! This module transforms flat execution logs into:
//! - A nested call tree (one node per invocation)
//! - A deduplicated call graph (one node per function)
//!
//! The two builders share no state and can run on the same events in any order.

pub mod call_graph;
pub mod call_tree;

// Re-export main types and functions
pub use call_graph::{Function, FunctionKey, FunctionSet};
pub use call_tree::{CallNode, ExecutionTree, FunctionCall};
