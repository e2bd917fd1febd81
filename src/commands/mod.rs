//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod analyze;
pub mod models;
pub mod replay;
pub mod utils;

// Re-export main command functions
pub use analyze::{execute_flame, execute_graph, execute_readable, execute_tree, validate_log_args};
pub use models::{parse_script, FlameArgs, GraphArgs, LogArgs, ReplayArgs, ReplayOp, TreeArgs};
pub use replay::{execute_replay, run_script, run_to_end, ReplayStep};
pub use utils::display_version;
