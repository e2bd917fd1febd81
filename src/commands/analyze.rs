//! Analysis command implementations.
//!
//! Each command:
//! 1. Loads and decodes the event log
//! 2. Builds the requested view (tree, graph or flame chart)
//! 3. Writes it to a file or stdout

use super::models::{FlameArgs, GraphArgs, LogArgs, TreeArgs};
use super::utils::{emit_json, emit_text, load_events};
use crate::aggregator::{ExecutionTree, FunctionSet};
use crate::flamegraph::{build_flame_chart, FlameChartConfig};
use crate::output::{function_set_to_dot, write_readable};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;
use std::time::Instant;

/// Execute the flame command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or malformed log
/// * Stack underflow under the strict policy
/// * Log without any call
pub fn execute_flame(args: &FlameArgs) -> Result<()> {
    let start_time = Instant::now();
    validate_log_args(&args.log)?;

    info!("Step 1/3: Loading events...");
    let events = load_events(&args.log.log_path)?;

    info!("Step 2/3: Building call tree...");
    let tree = ExecutionTree::from_events_with_policy(&events, args.log.policy)
        .context("Failed to reconstruct call tree")?;

    info!("Step 3/3: Projecting flame chart (max depth {})...", args.max_depth);
    let config = FlameChartConfig::new().with_max_depth(args.max_depth);
    let chart = build_flame_chart(&tree, Some(&config)).context("Failed to build flame chart")?;

    debug!(
        "Flame chart: {} calls over {:.3}s",
        chart.calls.len(),
        chart.total_seconds
    );
    emit_json(&chart, args.output.as_deref())?;

    info!("Flame chart completed in {:.2}s", start_time.elapsed().as_secs_f64());
    Ok(())
}

/// Execute the tree command
pub fn execute_tree(args: &TreeArgs) -> Result<()> {
    validate_log_args(&args.log)?;

    let events = load_events(&args.log.log_path)?;
    let tree = ExecutionTree::from_events_with_policy(&events, args.log.policy)
        .context("Failed to reconstruct call tree")?;

    info!(
        "Call tree: {} top-level calls, max depth {}",
        tree.len(),
        tree.max_depth()
    );
    emit_json(&tree.to_data(args.max_depth), args.output.as_deref())
}

/// Execute the graph command
pub fn execute_graph(args: &GraphArgs) -> Result<()> {
    validate_log_args(&args.log)?;

    let events = load_events(&args.log.log_path)?;
    let functions = FunctionSet::from_events_with_policy(&events, args.log.policy)
        .context("Failed to reconstruct call graph")?;

    info!(
        "Call graph: {} functions, {} edges",
        functions.len(),
        functions.edge_count()
    );

    if args.dot {
        emit_text(&function_set_to_dot(&functions), args.output.as_deref())
    } else {
        emit_json(&functions.to_data(), args.output.as_deref())
    }
}

/// Execute the readable command, writing one line per event to `out`
pub fn execute_readable<W: Write>(args: &LogArgs, out: &mut W) -> Result<()> {
    validate_log_args(args)?;

    let events = load_events(&args.log_path)?;
    write_readable(out, &events).context("Failed to write readable listing")?;
    Ok(())
}

/// Validate log arguments
///
/// **Public** - can be called before any command for early validation
pub fn validate_log_args(args: &LogArgs) -> Result<()> {
    if args.log_path.as_os_str().is_empty() {
        anyhow::bail!("Log path cannot be empty");
    }

    if !args.log_path.exists() {
        anyhow::bail!("Log file not found: {}", args.log_path.display());
    }

    if args.log_path.is_dir() {
        anyhow::bail!("Log path is a directory: {}", args.log_path.display());
    }

    Ok(())
}
