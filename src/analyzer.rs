//! This module provides functions for analyzing automata to detect malformed specifications
//! before simulation. This includes checks for declared states, initial states, symbols, and
//! reachability.

use crate::types::{Automaton, AutomatonError, EPSILON};
use std::collections::{HashSet, VecDeque};

/// Represents various errors that can be found during the analysis of an automaton.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// Indicates that the `#states` section is empty.
    NoStates,
    /// Indicates that a state is declared more than once.
    DuplicateStates(Vec<String>),
    /// Indicates that the `#initial` section is empty.
    NoInitialState,
    /// Indicates initial states that are not declared in `#states`.
    UndefinedInitialStates(Vec<String>),
    /// Indicates accepting states that are not declared in `#states`.
    UndefinedAcceptingStates(Vec<String>),
    /// Indicates transitions that leave from, or lead to, undeclared states.
    UndefinedTransitionStates(Vec<String>),
    /// Indicates transitions labelled with symbols outside the alphabet.
    UndefinedSymbols(Vec<String>),
    /// Indicates transitions without any destination.
    EmptyTargets(Vec<String>),
    /// Indicates transitions that list the same destination more than once.
    DuplicateTargets(Vec<String>),
}

impl From<AnalysisError> for AutomatonError {
    /// Converts an `AnalysisError` into an `AutomatonError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::NoStates => {
                AutomatonError::ValidationError("No states defined".to_string())
            }
            AnalysisError::DuplicateStates(states) => {
                AutomatonError::ValidationError(format!("Duplicate states: {:?}", states))
            }
            AnalysisError::NoInitialState => {
                AutomatonError::ValidationError("No initial state defined".to_string())
            }
            AnalysisError::UndefinedInitialStates(states) => AutomatonError::ValidationError(
                format!("Initial states are not declared: {:?}", states),
            ),
            AnalysisError::UndefinedAcceptingStates(states) => AutomatonError::ValidationError(
                format!("Accepting states are not declared: {:?}", states),
            ),
            AnalysisError::UndefinedTransitionStates(transitions) => {
                AutomatonError::ValidationError(format!(
                    "Transitions reference undeclared states: {:?}",
                    transitions
                ))
            }
            AnalysisError::UndefinedSymbols(transitions) => AutomatonError::ValidationError(
                format!("Transitions use symbols outside the alphabet: {:?}", transitions),
            ),
            AnalysisError::EmptyTargets(transitions) => AutomatonError::ValidationError(
                format!("Transitions without destinations: {:?}", transitions),
            ),
            AnalysisError::DuplicateTargets(transitions) => AutomatonError::ValidationError(
                format!("Transitions with repeated destinations: {:?}", transitions),
            ),
        }
    }
}

/// Analyzes an `Automaton` for structural errors.
///
/// Unreachable states are not an error; they are reported through the log.
///
/// # Arguments
///
/// * `automaton` - A reference to the `Automaton` to be analyzed.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(AutomatonError::ValidationError)` describing the first violated rule.
pub fn analyze(automaton: &Automaton) -> Result<(), AutomatonError> {
    let checks: [fn(&Automaton) -> Result<(), AnalysisError>; 8] = [
        check_states,
        check_duplicate_states,
        check_initial_states,
        check_accepting_states,
        check_transition_states,
        check_transition_symbols,
        check_transition_targets,
        check_duplicate_targets,
    ];

    if let Some(error) = checks.iter().find_map(|check| check(automaton).err()) {
        return Err(error.into());
    }

    let unreachable = unreachable_states(automaton);
    if !unreachable.is_empty() {
        log::warn!("unreachable states: {:?}", unreachable);
    }

    Ok(())
}

/// Returns the declared states that cannot be reached from any initial state, in declaration order.
///
/// Every transition is followed regardless of its symbol, epsilon included.
pub fn unreachable_states(automaton: &Automaton) -> Vec<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<&str> = automaton.initial.iter().map(String::as_str).collect();

    while let Some(state) = queue.pop_front() {
        if !visited.insert(state) {
            continue;
        }

        for transition in automaton.transitions.iter().filter(|t| t.source == state) {
            for target in &transition.targets {
                if !visited.contains(target.as_str()) {
                    queue.push_back(target);
                }
            }
        }
    }

    automaton
        .states
        .iter()
        .filter(|s| !visited.contains(s.as_str()))
        .cloned()
        .collect()
}

fn check_states(automaton: &Automaton) -> Result<(), AnalysisError> {
    if automaton.states.is_empty() {
        return Err(AnalysisError::NoStates);
    }

    Ok(())
}

fn check_duplicate_states(automaton: &Automaton) -> Result<(), AnalysisError> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<String> = automaton
        .states
        .iter()
        .filter(|s| !seen.insert(s.as_str()))
        .cloned()
        .collect();

    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(AnalysisError::DuplicateStates(duplicates));
    }

    Ok(())
}

fn check_initial_states(automaton: &Automaton) -> Result<(), AnalysisError> {
    if automaton.initial.is_empty() {
        return Err(AnalysisError::NoInitialState);
    }

    let undefined = undeclared(automaton, &automaton.initial);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedInitialStates(undefined));
    }

    Ok(())
}

fn check_accepting_states(automaton: &Automaton) -> Result<(), AnalysisError> {
    let undefined = undeclared(automaton, &automaton.accepting);
    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedAcceptingStates(undefined));
    }

    Ok(())
}

/// Checks that every transition leaves from, and leads to, declared states.
fn check_transition_states(automaton: &Automaton) -> Result<(), AnalysisError> {
    let mut undefined = Vec::new();
    for t in &automaton.transitions {
        if !automaton.is_state(&t.source) {
            undefined.push(format!("{}:{} (source)", t.source, t.symbol));
        }
        for target in t.targets.iter().filter(|s| !automaton.is_state(s)) {
            undefined.push(format!("{}:{}>{}", t.source, t.symbol, target));
        }
    }

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedTransitionStates(undefined));
    }

    Ok(())
}

/// Checks that every transition symbol is in the alphabet. Epsilon is always allowed.
fn check_transition_symbols(automaton: &Automaton) -> Result<(), AnalysisError> {
    let undefined: Vec<String> = automaton
        .transitions
        .iter()
        .filter(|t| t.symbol != EPSILON && !automaton.alphabet.contains(&t.symbol))
        .map(|t| format!("{}:{}", t.source, t.symbol))
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedSymbols(undefined));
    }

    Ok(())
}

fn check_transition_targets(automaton: &Automaton) -> Result<(), AnalysisError> {
    let empty: Vec<String> = automaton
        .transitions
        .iter()
        .filter(|t| t.targets.is_empty())
        .map(|t| format!("{}:{}", t.source, t.symbol))
        .collect();

    if !empty.is_empty() {
        return Err(AnalysisError::EmptyTargets(empty));
    }

    Ok(())
}

/// Checks that no transition lists a destination twice, so the target count is the size of the
/// destination set.
fn check_duplicate_targets(automaton: &Automaton) -> Result<(), AnalysisError> {
    let duplicated: Vec<String> = automaton
        .transitions
        .iter()
        .filter(|t| {
            let mut seen = HashSet::new();
            !t.targets.iter().all(|target| seen.insert(target.as_str()))
        })
        .map(|t| format!("{}:{}", t.source, t.symbol))
        .collect();

    if !duplicated.is_empty() {
        return Err(AnalysisError::DuplicateTargets(duplicated));
    }

    Ok(())
}

fn undeclared(automaton: &Automaton, states: &[String]) -> Vec<String> {
    states
        .iter()
        .filter(|s| !automaton.is_state(s))
        .cloned()
        .collect()
}
