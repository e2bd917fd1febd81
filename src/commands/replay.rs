//! Replay command implementation.
//!
//! Without a script, steps forward through the whole trace printing the
//! location stack after each event. With a script, applies each navigation
//! operation in turn and prints the resulting position and stack.

use super::analyze::validate_log_args;
use super::models::{ReplayArgs, ReplayOp};
use super::utils::load_events;
use crate::replay::{Location, Stepper};
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;
use std::io::Write;

/// Stepper state after one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayStep {
    /// Operation that produced this state
    pub op: String,
    pub position: usize,
    pub stack: Vec<Location>,
}

impl ReplayStep {
    fn capture(op: &ReplayOp, stepper: &Stepper) -> Self {
        Self {
            op: op.to_string(),
            position: stepper.position(),
            stack: stepper.locations().to_vec(),
        }
    }
}

/// Apply one operation to a stepper
pub fn apply_op(stepper: &mut Stepper, op: &ReplayOp) {
    match op {
        ReplayOp::Forward => {
            stepper.step_forwards();
        }
        ReplayOp::Backward => {
            stepper.step_backwards();
        }
        ReplayOp::Over => stepper.step_over(),
        ReplayOp::Out => stepper.step_out(),
        ReplayOp::Until(location) => stepper.step_until_location(location),
        ReplayOp::Seek(index) => stepper.seek(*index),
    }
}

/// Run a script against a stepper, recording the state after every operation
pub fn run_script(stepper: &mut Stepper, ops: &[ReplayOp]) -> Vec<ReplayStep> {
    ops.iter()
        .map(|op| {
            apply_op(stepper, op);
            ReplayStep::capture(op, stepper)
        })
        .collect()
}

/// Step forward to the end, recording the state after every event
pub fn run_to_end(stepper: &mut Stepper) -> Vec<ReplayStep> {
    let mut steps = Vec::with_capacity(stepper.len());
    while stepper.step_forwards() {
        steps.push(ReplayStep::capture(&ReplayOp::Forward, stepper));
    }
    steps
}

/// Execute the replay command, writing one line per recorded state to `out`
pub fn execute_replay<W: Write>(args: &ReplayArgs, out: &mut W) -> Result<()> {
    validate_log_args(&args.log)?;

    let events = load_events(&args.log.log_path)?;
    let mut stepper = Stepper::new(events);

    let steps = match &args.script {
        Some(ops) => {
            info!("Replaying {} operations over {} events", ops.len(), stepper.len());
            run_script(&mut stepper, ops)
        }
        None => run_to_end(&mut stepper),
    };

    for step in &steps {
        let stack: Vec<String> = step.stack.iter().map(Location::to_string).collect();
        writeln!(out, "[{}] {}: [{}]", step.position, step.op, stack.join(", "))
            .context("Failed to write replay output")?;
    }

    Ok(())
}
