//! Execlog
//!
//! Reconstructs structured views of a program execution from a flat,
//! time-ordered log of events (calls, returns, exceptions, line steps):
//!
//! - [`aggregator::ExecutionTree`] - nested call tree
//! - [`aggregator::FunctionSet`] - deduplicated caller/callee graph
//! - [`flamegraph::build_flame_chart`] - depth-limited, time-scaled flame chart
//! - [`replay::Stepper`] - undoable cursor over the call stack at any point
//!
//! This crate provides the core implementation for the `execlog` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! execlog flame trace.log --output flame.json
//! execlog replay trace.log --script "f, f, over, out"
//! ```

pub mod aggregator;
pub mod commands;
pub mod flamegraph;
pub mod output;
pub mod parser;
pub mod replay;
pub mod utils;
