//! This module defines the `Simulator`, which answers membership queries for a finite automaton.
//!
//! The simulator owns a [`Graph`] built from the automaton and steps through the input either along
//! a single path (deterministic automata) or over a set of active states with epsilon-closure
//! (non-deterministic automata). Which strategy is used is decided once, by the classifier.

use crate::classifier::classify;
use crate::graph::{Edge, Graph};
use crate::types::{Automaton, AutomatonError, Determinism, Halt, Step, EPSILON};
use std::collections::{BTreeSet, HashSet, VecDeque};

/// A set of active states, ordered by label.
pub type StateSet = BTreeSet<String>;

/// Answers acceptance queries for one automaton.
///
/// The simulator copies what it needs out of the [`Automaton`] and never mutates it, so a model can
/// be classified, rendered and simulated in any order.
#[derive(Debug, Clone)]
pub struct Simulator {
    graph: Graph,
    initial: Vec<String>,
    accepting: HashSet<String>,
    determinism: Determinism,
}

impl Simulator {
    /// Builds a simulator for `automaton`.
    ///
    /// All states are registered as vertices before any edge is added, then every destination of
    /// every transition becomes one edge, in declaration order.
    ///
    /// # Returns
    ///
    /// * `Ok(Simulator)` if the automaton has at least one initial state.
    /// * `Err(AutomatonError::NoInitialState)` otherwise.
    pub fn new(automaton: &Automaton) -> Result<Self, AutomatonError> {
        if automaton.initial.is_empty() {
            return Err(AutomatonError::NoInitialState);
        }

        let mut graph = Graph::new();
        for state in &automaton.states {
            graph.add_vertex(state);
        }
        for transition in &automaton.transitions {
            for target in &transition.targets {
                graph.add_edge(&transition.source, target, &transition.symbol);
            }
        }

        let determinism = classify(automaton);

        log::debug!(
            "built {} simulator: {} vertices, {} edges",
            determinism.abbreviation(),
            graph.vertex_count(),
            graph.edge_count()
        );

        Ok(Self {
            graph,
            initial: automaton.initial.clone(),
            accepting: automaton.accepting.iter().cloned().collect(),
            determinism,
        })
    }

    /// Returns the classification that selected the stepping strategy.
    pub fn determinism(&self) -> Determinism {
        self.determinism
    }

    /// Returns the graph the simulator traverses.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Returns the declared initial states.
    pub fn initial(&self) -> &[String] {
        &self.initial
    }

    pub fn is_accepting(&self, state: &str) -> bool {
        self.accepting.contains(state)
    }

    /// Returns the destination of the first edge of `state` labelled `symbol`.
    ///
    /// Edges are scanned in insertion order, so if a malformed deterministic automaton has several
    /// edges for the same symbol, the first one wins.
    pub fn step(&self, state: &str, symbol: &str) -> Result<Option<&str>, AutomatonError> {
        Ok(self
            .edges(state)?
            .iter()
            .find(|edge| edge.weight == symbol)
            .map(|edge| edge.destination.as_str()))
    }

    /// Returns the destinations of the edges of `state` labelled `symbol`, together with the
    /// destinations of its epsilon edges.
    pub fn next_states(&self, state: &str, symbol: &str) -> Result<StateSet, AutomatonError> {
        let edges = self.edges(state)?;

        Ok(edges
            .iter()
            .filter(|edge| edge.weight == symbol || edge.weight == EPSILON)
            .map(|edge| edge.destination.clone())
            .collect())
    }

    /// Returns every state reachable from `state` through epsilon edges only, `state` included.
    pub fn epsilon_closure(&self, state: &str) -> Result<StateSet, AutomatonError> {
        let mut closure = StateSet::new();
        let mut queue = VecDeque::from([state.to_string()]);

        while let Some(current) = queue.pop_front() {
            if closure.contains(&current) {
                continue;
            }

            for edge in self.edges(&current)? {
                if edge.weight == EPSILON && !closure.contains(&edge.destination) {
                    queue.push_back(edge.destination.clone());
                }
            }

            closure.insert(current);
        }

        Ok(closure)
    }

    /// Returns the union of the epsilon-closures of `states`.
    pub fn close(&self, states: &StateSet) -> Result<StateSet, AutomatonError> {
        let mut closure = StateSet::new();
        for state in states {
            if !closure.contains(state) {
                closure.extend(self.epsilon_closure(state)?);
            }
        }

        Ok(closure)
    }

    /// Returns the active states before any input is consumed.
    ///
    /// A deterministic run starts from the first initial state only. A non-deterministic run starts
    /// from the epsilon-closure of all initial states.
    pub fn start(&self) -> Result<StateSet, AutomatonError> {
        match self.determinism {
            Determinism::Deterministic => {
                let first = self
                    .initial
                    .first()
                    .ok_or(AutomatonError::NoInitialState)?;
                self.edges(first)?;
                Ok(StateSet::from([first.clone()]))
            }
            Determinism::NonDeterministic => {
                self.close(&self.initial.iter().cloned().collect())
            }
        }
    }

    /// Consumes `symbol` from every state in `active`.
    ///
    /// An empty result means no path survived.
    pub fn advance(&self, active: &StateSet, symbol: &str) -> Result<StateSet, AutomatonError> {
        match self.determinism {
            Determinism::Deterministic => {
                let mut next = StateSet::new();
                if let Some(state) = active.first() {
                    if let Some(destination) = self.step(state, symbol)? {
                        self.edges(destination)?;
                        next.insert(destination.to_string());
                    }
                }
                Ok(next)
            }
            Determinism::NonDeterministic => {
                let mut next = StateSet::new();
                for state in active {
                    next.extend(self.next_states(state, symbol)?);
                }

                if next.is_empty() {
                    return Ok(next);
                }

                self.close(&next)
            }
        }
    }

    /// Checks if any state in `active` is accepting.
    pub fn any_accepting(&self, active: &StateSet) -> bool {
        active.iter().any(|state| self.is_accepting(state))
    }

    /// Starts a step-wise run over a sequence of symbols.
    pub fn run<I, S>(&self, input: I) -> Run<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Run::new(self, input.into_iter().map(Into::into).collect())
    }

    /// Checks if the automaton accepts the sequence of symbols `input`.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` or `Ok(false)` for acceptance or rejection. Undefined transitions and unknown
    ///   symbols are rejections.
    /// * `Err(AutomatonError::UnknownState)` if the run reached a state that is not a vertex.
    pub fn accepts<S: AsRef<str>>(&self, input: &[S]) -> Result<bool, AutomatonError> {
        let mut run = self.run(input.iter().map(|s| s.as_ref().to_string()));

        match run.finish() {
            Halt::Accept => Ok(true),
            Halt::Reject => Ok(false),
            Halt::Err(e) => Err(e),
        }
    }

    /// Checks if the automaton accepts `input`, read as a sequence of single-character symbols.
    pub fn accepts_str(&self, input: &str) -> Result<bool, AutomatonError> {
        let symbols: Vec<String> = input.chars().map(String::from).collect();
        self.accepts(&symbols)
    }

    fn edges(&self, state: &str) -> Result<&[Edge], AutomatonError> {
        self.graph
            .edges(state)
            .ok_or_else(|| AutomatonError::UnknownState(state.to_string()))
    }
}

/// Builds a simulator for `automaton` and checks if it accepts `input`.
pub fn accepts(automaton: &Automaton, input: &str) -> Result<bool, AutomatonError> {
    Simulator::new(automaton)?.accepts_str(input)
}

/// A single membership query, consumed one symbol at a time.
#[derive(Debug)]
pub struct Run<'a> {
    simulator: &'a Simulator,
    input: Vec<String>,
    position: usize,
    active: StateSet,
    halted: Option<Halt>,
}

impl<'a> Run<'a> {
    fn new(simulator: &'a Simulator, input: Vec<String>) -> Self {
        let (active, halted) = match simulator.start() {
            Ok(active) => (active, None),
            Err(e) => (StateSet::new(), Some(Halt::Err(e))),
        };

        Self {
            simulator,
            input,
            position: 0,
            active,
            halted,
        }
    }

    /// Consumes the next symbol.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if the symbol was consumed and some state is still active.
    /// * `Step::Halt(_)` once the verdict is known. Further calls return the same verdict.
    pub fn step(&mut self) -> Step {
        if let Some(halt) = &self.halted {
            return Step::Halt(halt.clone());
        }

        let Some(symbol) = self.input.get(self.position) else {
            let halt = if self.simulator.any_accepting(&self.active) {
                Halt::Accept
            } else {
                Halt::Reject
            };
            return self.halt(halt);
        };

        match self.simulator.advance(&self.active, symbol) {
            Ok(next) if next.is_empty() => {
                log::trace!("no transition on {symbol:?} at position {}", self.position);
                self.active = next;
                self.halt(Halt::Reject)
            }
            Ok(next) => {
                log::trace!("{symbol:?}: {:?} -> {:?}", self.active, next);
                self.active = next;
                self.position += 1;
                Step::Continue
            }
            Err(e) => self.halt(Halt::Err(e)),
        }
    }

    /// Steps until the run halts and returns the verdict.
    pub fn finish(&mut self) -> Halt {
        loop {
            if let Step::Halt(halt) = self.step() {
                return halt;
            }
        }
    }

    /// Returns the currently active states.
    pub fn active(&self) -> &StateSet {
        &self.active
    }

    /// Returns the number of symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    fn halt(&mut self, halt: Halt) -> Step {
        self.halted = Some(halt.clone());
        Step::Halt(halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transition;
    use pretty_assertions::assert_eq;

    fn set(states: &[&str]) -> StateSet {
        states.iter().map(|s| s.to_string()).collect()
    }

    fn automaton(
        states: &[&str],
        initial: &[&str],
        accepting: &[&str],
        alphabet: &[&str],
        transitions: Vec<Transition>,
    ) -> Automaton {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Automaton {
            states: strings(states),
            initial: strings(initial),
            accepting: strings(accepting),
            alphabet: strings(alphabet),
            transitions,
        }
    }

    fn single_a() -> Automaton {
        automaton(
            &["s0", "s1"],
            &["s0"],
            &["s1"],
            &["a"],
            vec![Transition::new("s0", "a", &["s1"])],
        )
    }

    fn epsilon_then_a() -> Automaton {
        automaton(
            &["s0", "s1", "s2"],
            &["s0"],
            &["s2"],
            &["a"],
            vec![
                Transition::new("s0", EPSILON, &["s1"]),
                Transition::new("s1", "a", &["s2"]),
            ],
        )
    }

    /// Accepts strings over {a, b} that end in "ab".
    fn ends_with_ab() -> Automaton {
        automaton(
            &["q0", "q1", "q2"],
            &["q0"],
            &["q2"],
            &["a", "b"],
            vec![
                Transition::new("q0", "a", &["q0", "q1"]),
                Transition::new("q0", "b", &["q0"]),
                Transition::new("q1", "b", &["q2"]),
            ],
        )
    }

    #[test]
    fn test_deterministic_single_symbol() {
        let simulator = Simulator::new(&single_a()).unwrap();

        assert_eq!(simulator.determinism(), Determinism::Deterministic);
        assert_eq!(simulator.accepts_str("a"), Ok(true));
        assert_eq!(simulator.accepts_str(""), Ok(false));
        assert_eq!(simulator.accepts_str("aa"), Ok(false));
    }

    #[test]
    fn test_unknown_symbol_is_rejection() {
        let simulator = Simulator::new(&single_a()).unwrap();

        assert_eq!(simulator.accepts_str("z"), Ok(false));
        assert_eq!(simulator.accepts(&["a", "z"]), Ok(false));
    }

    #[test]
    fn test_empty_input_accepts_accepting_initial_state() {
        let mut a = single_a();
        a.accepting.push("s0".into());

        assert_eq!(accepts(&a, ""), Ok(true));
    }

    #[test]
    fn test_epsilon_then_symbol() {
        let simulator = Simulator::new(&epsilon_then_a()).unwrap();

        assert_eq!(simulator.determinism(), Determinism::NonDeterministic);
        assert_eq!(simulator.accepts_str("a"), Ok(true));
        assert_eq!(simulator.accepts_str(""), Ok(false));
    }

    #[test]
    fn test_empty_input_follows_epsilon_to_accepting() {
        let a = automaton(
            &["s0", "s1", "s2"],
            &["s0"],
            &["s2"],
            &["a"],
            vec![
                Transition::new("s0", EPSILON, &["s1"]),
                Transition::new("s1", EPSILON, &["s2"]),
            ],
        );

        assert_eq!(accepts(&a, ""), Ok(true));
    }

    #[test]
    fn test_non_deterministic_search() {
        let simulator = Simulator::new(&ends_with_ab()).unwrap();

        assert_eq!(simulator.determinism(), Determinism::NonDeterministic);
        assert_eq!(simulator.accepts_str("ab"), Ok(true));
        assert_eq!(simulator.accepts_str("babab"), Ok(true));
        assert_eq!(simulator.accepts_str("aab"), Ok(true));
        assert_eq!(simulator.accepts_str("aba"), Ok(false));
        assert_eq!(simulator.accepts_str("b"), Ok(false));
        assert_eq!(simulator.accepts_str(""), Ok(false));
    }

    #[test]
    fn test_multiple_initial_states() {
        let mut a = ends_with_ab();
        a.states.push("p0".into());
        a.initial.push("p0".into());
        a.accepting.push("p0".into());

        // p0 is accepting and has no transitions
        assert_eq!(accepts(&a, ""), Ok(true));
        assert_eq!(accepts(&a, "ab"), Ok(true));
        assert_eq!(accepts(&a, "a"), Ok(false));
    }

    #[test]
    fn test_deterministic_uses_first_initial_state() {
        let mut a = single_a();
        a.initial = vec!["s1".into(), "s0".into()];

        let simulator = Simulator::new(&a).unwrap();
        assert_eq!(simulator.start(), Ok(set(&["s1"])));
        assert_eq!(simulator.accepts_str(""), Ok(true));
        assert_eq!(simulator.accepts_str("a"), Ok(false));
    }

    #[test]
    fn test_step_first_match_wins() {
        let a = automaton(
            &["s0", "s1", "s2"],
            &["s0"],
            &["s2"],
            &["a"],
            vec![
                Transition::new("s0", "a", &["s1"]),
                Transition::new("s0", "a", &["s2"]),
            ],
        );

        let simulator = Simulator::new(&a).unwrap();
        assert_eq!(simulator.determinism(), Determinism::Deterministic);
        assert_eq!(simulator.step("s0", "a"), Ok(Some("s1")));
        assert_eq!(simulator.step("s0", "b"), Ok(None));
        assert_eq!(simulator.accepts_str("a"), Ok(false));
    }

    #[test]
    fn test_next_states_include_epsilon_destinations() {
        let a = automaton(
            &["s0", "s1", "s2", "s3"],
            &["s0"],
            &["s3"],
            &["a", "b"],
            vec![
                Transition::new("s0", "a", &["s1", "s2"]),
                Transition::new("s0", "b", &["s3"]),
                Transition::new("s0", EPSILON, &["s3"]),
            ],
        );

        let simulator = Simulator::new(&a).unwrap();
        assert_eq!(simulator.next_states("s0", "a"), Ok(set(&["s1", "s2", "s3"])));
        assert_eq!(simulator.next_states("s1", "a"), Ok(set(&[])));
    }

    #[test]
    fn test_epsilon_closure() {
        let a = automaton(
            &["s0", "s1", "s2", "s3"],
            &["s0"],
            &["s3"],
            &["a"],
            vec![
                Transition::new("s0", EPSILON, &["s1"]),
                Transition::new("s1", EPSILON, &["s2", "s0"]),
                Transition::new("s2", "a", &["s3"]),
            ],
        );

        let simulator = Simulator::new(&a).unwrap();
        let closure = simulator.epsilon_closure("s0").unwrap();
        assert_eq!(closure, set(&["s0", "s1", "s2"]));
        assert_eq!(simulator.epsilon_closure("s3"), Ok(set(&["s3"])));

        // Closing a closed set changes nothing
        assert_eq!(simulator.close(&closure), Ok(closure.clone()));
    }

    #[test]
    fn test_no_initial_state() {
        let mut a = single_a();
        a.initial.clear();

        let result = Simulator::new(&a);
        assert!(matches!(result, Err(AutomatonError::NoInitialState)));
        assert_eq!(accepts(&a, "a"), Err(AutomatonError::NoInitialState));
    }

    #[test]
    fn test_dangling_destination_is_unknown_state() {
        let a = automaton(
            &["s0", "s1"],
            &["s0"],
            &["s1"],
            &["a"],
            vec![Transition::new("s0", "a", &["ghost"])],
        );

        let simulator = Simulator::new(&a).unwrap();
        assert_eq!(
            simulator.accepts_str("a"),
            Err(AutomatonError::UnknownState("ghost".into()))
        );
        // Never reaching the dangling edge is fine
        assert_eq!(simulator.accepts_str("b"), Ok(false));
    }

    #[test]
    fn test_dangling_destination_in_non_deterministic_run() {
        let a = automaton(
            &["s0", "s1"],
            &["s0"],
            &["s1"],
            &["a"],
            vec![Transition::new("s0", "a", &["s1", "ghost"])],
        );

        assert_eq!(
            accepts(&a, "a"),
            Err(AutomatonError::UnknownState("ghost".into()))
        );
    }

    #[test]
    fn test_adding_destinations_keeps_acceptance() {
        let base = ends_with_ab();
        let mut wider = base.clone();
        wider.transitions[2].targets.push("q0".into());
        wider.transitions[1].targets.push("q1".into());

        for input in ["ab", "aab", "bab", "abab"] {
            assert_eq!(accepts(&base, input), Ok(true));
            assert_eq!(accepts(&wider, input), Ok(true), "input {input:?}");
        }
    }

    #[test]
    fn test_simulation_does_not_mutate_model() {
        let a = ends_with_ab();
        let before = a.clone();

        let simulator = Simulator::new(&a).unwrap();
        let _ = simulator.accepts_str("abab");

        assert_eq!(a, before);
    }

    #[test]
    fn test_run_steps() {
        let simulator = Simulator::new(&ends_with_ab()).unwrap();
        let mut run = simulator.run(["a", "b"]);

        assert_eq!(run.active(), &set(&["q0"]));

        assert_eq!(run.step(), Step::Continue);
        assert_eq!(run.active(), &set(&["q0", "q1"]));
        assert_eq!(run.position(), 1);

        assert_eq!(run.step(), Step::Continue);
        assert_eq!(run.active(), &set(&["q0", "q2"]));

        assert_eq!(run.step(), Step::Halt(Halt::Accept));
        assert!(run.is_halted());
        // The verdict is sticky
        assert_eq!(run.step(), Step::Halt(Halt::Accept));
    }

    #[test]
    fn test_run_rejects_when_no_path_survives() {
        let simulator = Simulator::new(&single_a()).unwrap();
        let mut run = simulator.run(["a", "a", "a"]);

        assert_eq!(run.step(), Step::Continue);
        assert_eq!(run.step(), Step::Halt(Halt::Reject));
        assert_eq!(run.position(), 1);
        assert!(run.active().is_empty());
    }

    #[test]
    fn test_multi_character_symbols() {
        let a = automaton(
            &["s0", "s1"],
            &["s0"],
            &["s1"],
            &["go", "stop"],
            vec![
                Transition::new("s0", "go", &["s1"]),
                Transition::new("s1", "stop", &["s0"]),
            ],
        );

        let simulator = Simulator::new(&a).unwrap();
        assert_eq!(simulator.accepts(&["go", "stop", "go"]), Ok(true));
        assert_eq!(simulator.accepts(&["go", "stop"]), Ok(false));
    }
}
