//! Random sample automata and query strings.
//!
//! Every generator takes the random number generator as an argument, so callers choose between
//! `rand::thread_rng()` and a seeded generator for reproducible output.

use crate::types::{Automaton, Determinism, Transition};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// The alphabet used by generated automata.
pub const SAMPLE_ALPHABET: [&str; 3] = ["a", "b", "c"];

const MIN_STATES: usize = 3;
const MAX_STATES: usize = 6;
const MAX_TARGETS: usize = 3;
const MAX_INPUT_LENGTH: usize = 15;

/// Generates an automaton with 3 to 6 states and a transition for every `(state, symbol)` pair.
///
/// A deterministic automaton gets exactly one destination per pair. A non-deterministic one gets
/// between one and three distinct destinations, so it may still turn out to be deterministic.
pub fn random_automaton<R: Rng + ?Sized>(rng: &mut R, kind: Determinism) -> Automaton {
    let count = rng.gen_range(MIN_STATES..=MAX_STATES);
    let states: Vec<String> = (0..count).map(|i| format!("s{i}")).collect();

    let initial = states[rng.gen_range(0..count)].clone();

    let accepting_count = rng.gen_range(1..=count / 2);
    let accepting = pick_distinct(rng, count, accepting_count)
        .into_iter()
        .map(|i| states[i].clone())
        .collect();

    let mut transitions = Vec::new();
    for state in &states {
        for symbol in SAMPLE_ALPHABET {
            let target_count = match kind {
                Determinism::Deterministic => 1,
                Determinism::NonDeterministic => rng.gen_range(1..=MAX_TARGETS),
            };
            let targets = pick_distinct(rng, count, target_count)
                .into_iter()
                .map(|i| states[i].clone())
                .collect();

            transitions.push(Transition {
                source: state.clone(),
                symbol: symbol.to_string(),
                targets,
            });
        }
    }

    Automaton {
        states,
        initial: vec![initial],
        accepting,
        alphabet: SAMPLE_ALPHABET.iter().map(|s| s.to_string()).collect(),
        transitions,
    }
}

/// Generates a query string of 1 to 15 symbols over the alphabet of `automaton`.
///
/// Returns an empty string if the alphabet is empty.
pub fn random_input<R: Rng + ?Sized>(rng: &mut R, automaton: &Automaton) -> String {
    if automaton.alphabet.is_empty() {
        return String::new();
    }

    let length = rng.gen_range(1..=MAX_INPUT_LENGTH);
    (0..length)
        .filter_map(|_| automaton.alphabet.choose(&mut *rng))
        .map(String::as_str)
        .collect()
}

/// Picks `amount` distinct indices below `bound`, in ascending order.
fn pick_distinct<R: Rng + ?Sized>(rng: &mut R, bound: usize, amount: usize) -> BTreeSet<usize> {
    rand::seq::index::sample(rng, bound, amount.min(bound))
        .into_iter()
        .collect()
}
