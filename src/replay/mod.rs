//! Steppable, undoable replay of the call stack.
//!
//! This module handles:
//! - A persistent location stack (old snapshots stay valid)
//! - Invertible commands derived from single events
//! - A stepper supporting forward/backward/over/out/until navigation

pub mod command;
pub mod stack;
pub mod stepper;

// Re-export main types
pub use command::{command_for_event, Command};
pub use stack::{Location, LocationStack};
pub use stepper::Stepper;
