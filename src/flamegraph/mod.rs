//! Flame chart projection.
//!
//! This module converts a call tree into a depth-limited, time-scaled list of
//! call records suitable for an interactive flame chart viewer.

pub mod generator;

// Re-export main types
pub use generator::{
    build_call_flame_chart, build_flame_chart, FlameCall, FlameChart, FlameChartConfig,
};
