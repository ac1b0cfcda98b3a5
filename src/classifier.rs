//! Structural classification of an automaton as deterministic or non-deterministic.

use crate::types::{Automaton, Determinism};

/// Classifies `automaton` by inspecting its transition relation.
///
/// The automaton is non-deterministic if some state has more than one destination for an alphabet
/// symbol, or has a non-empty epsilon transition. Totality is not checked: a missing transition is a
/// rejection during simulation, not a sign of non-determinism.
pub fn classify(automaton: &Automaton) -> Determinism {
    let determinism = if has_multiple_targets(automaton) || automaton.has_epsilon() {
        Determinism::NonDeterministic
    } else {
        Determinism::Deterministic
    };

    log::debug!(
        "classified automaton with {} states as {}",
        automaton.states.len(),
        determinism.abbreviation()
    );

    determinism
}

fn has_multiple_targets(automaton: &Automaton) -> bool {
    automaton.transitions.iter().any(|t| {
        automaton.alphabet.iter().any(|symbol| *symbol == t.symbol) && t.targets.len() > 1
    })
}
