//! This module defines the core data structures and types used throughout the automaton
//! simulator, including the automaton model, transitions, classification and error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Rule;

/// The reserved symbol for a transition that consumes no input.
pub const EPSILON: &str = "$";
/// The maximum allowed size for an automaton specification in bytes.
pub const MAX_SPEC_SIZE: usize = 65536; // 64KB

/// A finite automaton as declared in the textual notation.
///
/// The model is a plain value: it is built once per specification and only read by the
/// classifier, the simulator and the encoders afterwards.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Automaton {
    /// Every state label, in declaration order.
    pub states: Vec<String>,
    /// The starting states. Deterministic simulation only uses the first one.
    pub initial: Vec<String>,
    /// The accepting states.
    pub accepting: Vec<String>,
    /// The input symbols. May include [`EPSILON`].
    pub alphabet: Vec<String>,
    /// The transition relation, one entry per `(source, symbol)` pair in declaration order.
    pub transitions: Vec<Transition>,
}

impl Automaton {
    /// Returns the destinations of `(state, symbol)`, if that pair has a transition.
    pub fn targets(&self, state: &str, symbol: &str) -> Option<&[String]> {
        self.transitions
            .iter()
            .find(|t| t.source == state && t.symbol == symbol)
            .map(|t| t.targets.as_slice())
    }

    /// Checks if `state` is declared as an accepting state.
    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.iter().any(|s| s == state)
    }

    /// Checks if `state` is a declared state.
    pub fn is_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Checks if any state has an epsilon transition.
    pub fn has_epsilon(&self) -> bool {
        self.transitions
            .iter()
            .any(|t| t.is_epsilon() && !t.targets.is_empty())
    }

    /// Returns the number of `(source, symbol, destination)` edges described by the model.
    pub fn transition_count(&self) -> usize {
        self.transitions.iter().map(|t| t.targets.len()).sum()
    }
}

/// A single line of the transition relation: `source:symbol>target1,target2,...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub source: String,
    pub symbol: String,
    /// Destinations in declaration order. More than one denotes non-determinism.
    pub targets: Vec<String>,
}

impl Transition {
    pub fn new(source: &str, symbol: &str, targets: &[&str]) -> Self {
        Self {
            source: source.to_string(),
            symbol: symbol.to_string(),
            targets: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        self.symbol == EPSILON
    }
}

/// The structural class of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Determinism {
    /// At most one destination per `(state, symbol)` and no epsilon transitions.
    Deterministic,
    /// Several destinations for some `(state, symbol)`, or epsilon transitions.
    NonDeterministic,
}

impl Determinism {
    /// Returns the conventional short name, `DFA` or `NFA`.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Determinism::Deterministic => "DFA",
            Determinism::NonDeterministic => "NFA",
        }
    }
}

impl std::fmt::Display for Determinism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Determinism::Deterministic => write!(f, "Deterministic Finite Automaton (DFA)"),
            Determinism::NonDeterministic => {
                write!(f, "Non-Deterministic Finite Automaton (NFA)")
            }
        }
    }
}

/// Represents the outcome of a single simulation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// One symbol was consumed and at least one state is still active.
    Continue,
    /// The run is over.
    Halt(Halt),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// All input consumed in an accepting configuration.
    Accept,
    /// No path survived, or the input ended outside the accepting states.
    Reject,

    Err(AutomatonError),
}

/// Represents various errors that can occur while building or simulating an automaton.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// Indicates an error during the parsing of an automaton specification.
    #[error("Specification parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a structural problem in an otherwise well-formed specification.
    #[error("Specification validation error: {0}")]
    ValidationError(String),
    /// Indicates that a simulator was requested for an automaton without a starting state.
    #[error("No initial state defined")]
    NoInitialState,
    /// Indicates that simulation reached a state that is not a vertex of the graph.
    #[error("Unknown state: {0}")]
    UnknownState(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}
