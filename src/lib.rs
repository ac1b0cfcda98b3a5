//! This crate provides the core logic for a finite automaton simulator.
//! It includes modules for parsing the automaton notation, validating and classifying automata
//! as deterministic or non-deterministic, and answering membership queries.

pub mod analyzer;
pub mod classifier;
pub mod encoder;
pub mod generator;
pub mod graph;
pub mod loader;
pub mod parser;
pub mod simulator;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `AnalysisError` enum from the analyzer module.
pub use analyzer::{analyze, unreachable_states, AnalysisError};
/// Re-exports the `classify` function from the classifier module.
pub use classifier::classify;
/// Re-exports the encoding functions from the encoder module.
pub use encoder::{encode, to_dot};
pub use generator::{random_automaton, random_input};
/// Re-exports the `Graph` struct and its `Edge` type from the graph module.
pub use graph::{Edge, Graph};
/// Re-exports the `AutomatonLoader` struct from the loader module.
pub use loader::AutomatonLoader;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports the simulator, its step-wise `Run`, and the one-shot `accepts` query.
pub use simulator::{accepts, Run, Simulator, StateSet};
/// Re-exports the automaton model and the types shared across modules.
pub use types::{
    Automaton, AutomatonError, Determinism, Halt, Step, Transition, EPSILON, MAX_SPEC_SIZE,
};
