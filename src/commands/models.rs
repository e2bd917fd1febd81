use crate::replay::Location;
use crate::utils::config::{UnderflowPolicy, DEFAULT_FLAME_DEPTH};
use crate::utils::error::ReplayError;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Arguments shared by every command that loads a log
#[derive(Debug, Clone, Default)]
pub struct LogArgs {
    /// Path to the NDJSON event log
    pub log_path: PathBuf,

    /// What to do with a return that has no open call
    pub policy: UnderflowPolicy,
}

/// Arguments for the flame command
#[derive(Debug, Clone)]
pub struct FlameArgs {
    pub log: LogArgs,

    /// Deepest level emitted
    pub max_depth: usize,

    /// Output path for the JSON chart (stdout when None)
    pub output: Option<PathBuf>,
}

impl Default for FlameArgs {
    fn default() -> Self {
        Self {
            log: LogArgs::default(),
            max_depth: DEFAULT_FLAME_DEPTH,
            output: None,
        }
    }
}

/// Arguments for the tree command
#[derive(Debug, Clone, Default)]
pub struct TreeArgs {
    pub log: LogArgs,

    /// Levels of sub-calls to emit (unbounded when None)
    pub max_depth: Option<usize>,

    /// Output path for the JSON tree (stdout when None)
    pub output: Option<PathBuf>,
}

/// Arguments for the graph command
#[derive(Debug, Clone, Default)]
pub struct GraphArgs {
    pub log: LogArgs,

    /// Emit Graphviz DOT instead of JSON
    pub dot: bool,

    /// Output path (stdout when None)
    pub output: Option<PathBuf>,
}

/// Arguments for the replay command
#[derive(Debug, Clone, Default)]
pub struct ReplayArgs {
    pub log: LogArgs,

    /// Navigation script; None steps forward through the whole trace
    pub script: Option<Vec<ReplayOp>>,
}

/// One navigation operation in a replay script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOp {
    Forward,
    Backward,
    Over,
    Out,
    Until(Location),
    Seek(usize),
}

impl fmt::Display for ReplayOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplayOp::Forward => f.write_str("forward"),
            ReplayOp::Backward => f.write_str("backward"),
            ReplayOp::Over => f.write_str("over"),
            ReplayOp::Out => f.write_str("out"),
            ReplayOp::Until(location) => write!(f, "until {}", location),
            ReplayOp::Seek(index) => write!(f, "seek {}", index),
        }
    }
}

/// Accepts `f`/`forward`, `b`/`back`/`backward`, `over`, `out`,
/// `until FILE:LINE` and `seek N`
impl FromStr for ReplayOp {
    type Err = ReplayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (word, rest) = match s.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (s, ""),
        };
        let unknown = || ReplayError::UnknownOperation(s.to_string());

        match (word, rest.is_empty()) {
            ("f" | "forward", true) => Ok(ReplayOp::Forward),
            ("b" | "back" | "backward", true) => Ok(ReplayOp::Backward),
            ("over", true) => Ok(ReplayOp::Over),
            ("out", true) => Ok(ReplayOp::Out),
            ("until", false) => Ok(ReplayOp::Until(rest.parse()?)),
            ("seek", false) => rest.parse().map(ReplayOp::Seek).map_err(|_| unknown()),
            _ => Err(unknown()),
        }
    }
}

/// Parse a comma-separated replay script, e.g. `f, f, over, until a.py:3, b`
pub fn parse_script(script: &str) -> Result<Vec<ReplayOp>, ReplayError> {
    script
        .split(',')
        .filter(|op| !op.trim().is_empty())
        .map(str::parse)
        .collect()
}
