//! Execlog CLI
//!
//! Reconstructs call trees, call graphs, flame charts and call-stack replays
//! from newline-delimited JSON execution logs.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use execlog::commands::{
    display_version, execute_flame, execute_graph, execute_readable, execute_replay,
    execute_tree, parse_script, FlameArgs, GraphArgs, LogArgs, ReplayArgs, TreeArgs,
};
use execlog::utils::config::{UnderflowPolicy, DEFAULT_FLAME_DEPTH};

/// Execlog - execution log reconstruction and replay
#[derive(Parser, Debug)]
#[command(name = "execlog")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Log input shared by every command
#[derive(Args, Debug)]
struct LogInput {
    /// Path to the NDJSON event log
    log: PathBuf,
}

/// Log input for the commands that rebuild calls (flame, tree, graph)
#[derive(Args, Debug)]
struct BuildInput {
    #[command(flatten)]
    input: LogInput,

    /// Fail on a return/exception with no open call instead of ignoring it
    #[arg(long)]
    strict: bool,
}

impl From<LogInput> for LogArgs {
    fn from(input: LogInput) -> Self {
        LogArgs {
            log_path: input.log,
            policy: UnderflowPolicy::Ignore,
        }
    }
}

impl From<BuildInput> for LogArgs {
    fn from(build: BuildInput) -> Self {
        LogArgs {
            policy: if build.strict {
                UnderflowPolicy::Fail
            } else {
                UnderflowPolicy::Ignore
            },
            ..LogArgs::from(build.input)
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Project the call tree onto a time-scaled flame chart (JSON)
    Flame {
        #[command(flatten)]
        input: BuildInput,

        /// Deepest call level to include
        #[arg(long, default_value_t = DEFAULT_FLAME_DEPTH)]
        max_depth: usize,

        /// Output path for the chart (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit the nested call tree (JSON)
    Tree {
        #[command(flatten)]
        input: BuildInput,

        /// Levels of sub-calls to include (unbounded if omitted)
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output path for the tree (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Emit the deduplicated call graph (JSON or DOT)
    Graph {
        #[command(flatten)]
        input: BuildInput,

        /// Emit Graphviz DOT instead of JSON
        #[arg(long)]
        dot: bool,

        /// Output path for the graph (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the log in a human-readable, tab-separated format
    Readable {
        #[command(flatten)]
        input: LogInput,
    },

    /// Replay the call stack, optionally following a navigation script
    Replay {
        #[command(flatten)]
        input: LogInput,

        /// Comma-separated operations: f, b, over, out, until FILE:LINE, seek N
        #[arg(short, long)]
        script: Option<String>,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Flame {
            input,
            max_depth,
            output,
        } => {
            execute_flame(&FlameArgs {
                log: input.into(),
                max_depth,
                output,
            })?;
        }

        Commands::Tree {
            input,
            max_depth,
            output,
        } => {
            execute_tree(&TreeArgs {
                log: input.into(),
                max_depth,
                output,
            })?;
        }

        Commands::Graph { input, dot, output } => {
            execute_graph(&GraphArgs {
                log: input.into(),
                dot,
                output,
            })?;
        }

        Commands::Readable { input } => {
            let args: LogArgs = input.into();
            execute_readable(&args, &mut std::io::stdout().lock())?;
        }

        Commands::Replay { input, script } => {
            let script = script.as_deref().map(parse_script).transpose()?;
            execute_replay(
                &ReplayArgs {
                    log: input.into(),
                    script,
                },
                &mut std::io::stdout().lock(),
            )?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
