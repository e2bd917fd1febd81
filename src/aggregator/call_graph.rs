//! Build a deduplicated caller/callee graph from a flat event sequence.
//!
//! Functions are identified by `(name, file_name, line_number)` taken from
//! their call events, so repeated invocations collapse into one node and each
//! distinct caller -> callee pair is recorded once.

use crate::parser::schema::Event;
use crate::utils::config::UnderflowPolicy;
use crate::utils::error::TreeError;
use log::debug;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Declaration-site identity of a function
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionKey {
    pub name: String,
    pub file_name: String,
    pub line_number: u32,
}

impl FunctionKey {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, line_number: u32) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            line_number,
        }
    }

    /// Key of the function entered by a call event (None for line events)
    pub fn from_event(event: &Event) -> Option<Self> {
        event
            .function_name()
            .map(|name| Self::new(name, event.file_name(), event.line_number()))
    }
}

impl fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.file_name, self.line_number)
    }
}

// Keys are emitted as `[name, file_name, line_number]`
impl Serialize for FunctionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.name, &self.file_name, self.line_number).serialize(serializer)
    }
}

/// A graph node aggregating every invocation of one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Function {
    pub name: String,
    pub file_name: String,
    pub line_number: u32,
    pub called_by: BTreeSet<FunctionKey>,
    pub calls: BTreeSet<FunctionKey>,
}

impl Function {
    pub fn new(key: &FunctionKey) -> Self {
        Self {
            name: key.name.clone(),
            file_name: key.file_name.clone(),
            line_number: key.line_number,
            called_by: BTreeSet::new(),
            calls: BTreeSet::new(),
        }
    }

    pub fn key(&self) -> FunctionKey {
        FunctionKey::new(&self.name, &self.file_name, self.line_number)
    }
}

/// Append-only mapping from key to function node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSet {
    functions: HashMap<FunctionKey, Function>,
}

impl FunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph, treating a return with no open call as a no-op
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a Event>,
    {
        match Self::from_events_with_policy(events, UnderflowPolicy::Ignore) {
            Ok(set) => set,
            // Ignore never reports an underflow
            Err(_) => Self::default(),
        }
    }

    /// Build the graph with an explicit stack underflow policy
    pub fn from_events_with_policy<'a, I>(
        events: I,
        policy: UnderflowPolicy,
    ) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = &'a Event>,
    {
        let mut set = FunctionSet::new();
        let mut call_stack: Vec<FunctionKey> = Vec::new();

        for (index, event) in events.into_iter().enumerate() {
            let change = event.stack_change();

            if change > 0 {
                let Some(key) = FunctionKey::from_event(event) else {
                    continue;
                };
                set.add_function(&key);
                if let Some(caller) = call_stack.last() {
                    set.add_call(caller, &key);
                }
                call_stack.push(key);
            } else if change < 0 && call_stack.pop().is_none() {
                if policy == UnderflowPolicy::Fail {
                    return Err(TreeError::StackUnderflow {
                        index,
                        kind: event.kind().tag(),
                    });
                }
                debug!("Ignoring {} event at index {} with no open call", event.kind(), index);
            }
        }

        debug!("Built call graph with {} functions", set.len());
        Ok(set)
    }

    pub fn get_function(&self, key: &FunctionKey) -> Option<&Function> {
        self.functions.get(key)
    }

    /// Resolve a function by key, creating it if unseen
    pub fn add_function(&mut self, key: &FunctionKey) -> &mut Function {
        self.functions
            .entry(key.clone())
            .or_insert_with(|| Function::new(key))
    }

    /// Record a caller -> callee edge on both ends, adding missing nodes
    pub fn add_call(&mut self, caller: &FunctionKey, callee: &FunctionKey) {
        self.add_function(caller).calls.insert(callee.clone());
        self.add_function(callee).called_by.insert(caller.clone());
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Functions in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Function> {
        self.functions.values()
    }

    /// Functions sorted by key
    pub fn sorted(&self) -> Vec<&Function> {
        let mut functions: Vec<&Function> = self.functions.values().collect();
        functions.sort_by_key(|f| f.key());
        functions
    }

    /// Serializable view: functions sorted by key, edge sets sorted
    pub fn to_data(&self) -> Vec<&Function> {
        self.sorted()
    }

    /// Total number of distinct caller -> callee edges
    pub fn edge_count(&self) -> usize {
        self.functions.values().map(|f| f.calls.len()).sum()
    }
}
