//! This module provides encoding functionality for writing an `Automaton` back out, either in the
//! textual notation accepted by the parser or as a Graphviz DOT graph for rendering.

use crate::simulator::Simulator;
use crate::types::{Automaton, AutomatonError};
use indexmap::IndexMap;

/// Encodes an automaton in the `#states ... #transitions` notation.
///
/// Sections and items keep their declaration order, and epsilon transitions are written with the
/// canonical marker, so parsing the result yields the same automaton.
///
/// # Arguments
///
/// * `automaton` - The `Automaton` to encode.
///
/// # Returns
///
/// * `String` - The specification text, without a trailing newline.
pub fn encode(automaton: &Automaton) -> String {
    let mut lines = Vec::new();

    let sections = [
        ("#states", &automaton.states),
        ("#initial", &automaton.initial),
        ("#accepting", &automaton.accepting),
        ("#alphabet", &automaton.alphabet),
    ];
    for (marker, items) in sections {
        lines.push(marker.to_string());
        lines.extend(items.iter().cloned());
    }

    lines.push("#transitions".to_string());
    for t in &automaton.transitions {
        lines.push(format!("{}:{}>{}", t.source, t.symbol, t.targets.join(",")));
    }

    lines.join("\n")
}

/// Renders an automaton as a Graphviz `digraph`.
///
/// Each state becomes a circle, drawn with a double border if it is accepting. All edges between
/// the same pair of states are merged into one, labelled with the comma-joined symbols. An
/// anonymous, invisible node points at the first initial state.
///
/// # Returns
///
/// * `Ok(String)` with the DOT source.
/// * `Err(AutomatonError::NoInitialState)` if there is no state to point the entry arrow at.
pub fn to_dot(automaton: &Automaton) -> Result<String, AutomatonError> {
    let simulator = Simulator::new(automaton)?;
    let graph = simulator.graph();
    let mut dot = String::from("digraph G {\n");

    for state in graph.vertices() {
        dot.push_str(&format!("  {} [shape=circle", quote(state)));
        if simulator.is_accepting(state) {
            dot.push_str(", peripheries=2");
        }
        dot.push_str("];\n");
    }

    for source in graph.vertices() {
        let mut labels: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for edge in graph.edges(source).unwrap_or_default() {
            let symbols = labels.entry(edge.destination.as_str()).or_default();
            if !symbols.contains(&edge.weight.as_str()) {
                symbols.push(&edge.weight);
            }
        }

        for (destination, symbols) in labels {
            dot.push_str(&format!(
                "  {} -> {} [label={}];\n",
                quote(source),
                quote(destination),
                quote(&symbols.join(","))
            ));
        }
    }

    if let Some(first) = simulator.initial().first() {
        dot.push_str("  \"\" [shape=none];\n");
        dot.push_str(&format!(
            "  \"\" -> {} [dir=forward, arrowhead=normal];\n",
            quote(first)
        ));
    }

    dot.push('}');
    Ok(dot)
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}
