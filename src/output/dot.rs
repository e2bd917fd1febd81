//! Graphviz DOT export of the call graph.
//!
//! Only the DOT text is produced; rendering it to an image is left to `dot`.

use crate::aggregator::call_graph::{FunctionKey, FunctionSet};
use std::fmt::Write;

/// Render the call graph as a DOT digraph
///
/// One box per function labelled `name\nfile:line`, one edge per distinct call.
/// Nodes and edges are emitted in key order so output is stable.
pub fn function_set_to_dot(functions: &FunctionSet) -> String {
    let mut out = String::from("digraph {\n");

    for function in functions.sorted() {
        let key = function.key();
        let label = format!(
            "{}\\n{}:{}",
            escape(&function.name),
            escape(&function.file_name),
            function.line_number
        );
        // Writing to a String cannot fail
        let _ = writeln!(out, "\t\"{}\" [label=\"{}\" shape=box]", node_id(&key), label);
    }

    for function in functions.sorted() {
        let caller = node_id(&function.key());
        for callee in &function.calls {
            let _ = writeln!(out, "\t\"{}\" -> \"{}\"", caller, node_id(callee));
        }
    }

    out.push_str("}\n");
    out
}

fn node_id(key: &FunctionKey) -> String {
    escape(&key.to_string())
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
