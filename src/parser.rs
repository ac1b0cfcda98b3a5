//! This module provides the parser for the finite automaton notation, utilizing the `pest` crate.
//! It defines the grammar for `.fa` files and functions to parse the input into an `Automaton`.

use crate::{
    analyzer::analyze,
    types::{Automaton, AutomatonError, Transition, EPSILON, MAX_SPEC_SIZE},
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::HashSet;

/// Derives a `PestParser` for the automaton notation defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct AutomatonParser;

/// Parses the given input string into an `Automaton`.
///
/// This is the main entry point for reading a specification. The parsed automaton is validated
/// before being returned, so a simulator can be built from it without further checks.
///
/// # Arguments
///
/// * `input` - A string slice containing the `#states ... #transitions` sections.
///
/// # Returns
///
/// * `Ok(Automaton)` if the input is successfully parsed and validated.
/// * `Err(AutomatonError::ParseError)` if there are syntax errors or duplicate transition lines.
/// * `Err(AutomatonError::ValidationError)` if the automaton fails validation.
pub fn parse(input: &str) -> Result<Automaton, AutomatonError> {
    if input.len() > MAX_SPEC_SIZE {
        return Err(AutomatonError::ValidationError(format!(
            "Specification is {} bytes, the limit is {} bytes",
            input.len(),
            MAX_SPEC_SIZE
        )));
    }

    let root = AutomatonParser::parse(Rule::automaton, input)
        .map_err(|e| AutomatonError::ParseError(Box::new(e)))?
        .next()
        .ok_or_else(|| AutomatonError::ValidationError("Empty specification".to_string()))?;

    let automaton = parse_automaton(root)?;

    analyze(&automaton)?;

    log::debug!(
        "parsed automaton: {} states, {} transitions",
        automaton.states.len(),
        automaton.transition_count()
    );

    Ok(automaton)
}

/// Walks the five sections of a `Pair<Rule::automaton>`.
fn parse_automaton(pair: Pair<Rule>) -> Result<Automaton, AutomatonError> {
    let mut automaton = Automaton::default();

    for section in pair.into_inner() {
        match section.as_rule() {
            Rule::states => automaton.states = parse_items(section),
            Rule::initial => automaton.initial = parse_items(section),
            Rule::accepting => automaton.accepting = parse_items(section),
            Rule::alphabet => automaton.alphabet = parse_items(section),
            Rule::transitions => automaton.transitions = parse_transitions(section)?,
            _ => {} // SOI, EOI
        }
    }

    Ok(automaton)
}

/// Collects the one-per-line items of a state or symbol section.
fn parse_items(pair: Pair<Rule>) -> Vec<String> {
    pair.into_inner().map(|p| p.as_str().to_string()).collect()
}

/// Parses the `#transitions` section.
///
/// Each `(source, symbol)` pair may appear on one line only.
fn parse_transitions(pair: Pair<Rule>) -> Result<Vec<Transition>, AutomatonError> {
    let mut transitions = Vec::new();
    let mut seen = HashSet::new();

    for line in pair.into_inner() {
        let span = line.as_span();
        let transition = parse_transition(line);

        if !seen.insert((transition.source.clone(), transition.symbol.clone())) {
            return Err(parse_error(
                &format!(
                    "Duplicate transition rule: {}:{}",
                    transition.source, transition.symbol
                ),
                span,
            ));
        }

        transitions.push(transition);
    }

    Ok(transitions)
}

/// Parses a single `SOURCE:SYMBOL>DEST1,DEST2` line.
///
/// An empty symbol is read as [`EPSILON`].
fn parse_transition(pair: Pair<Rule>) -> Transition {
    let mut source = String::new();
    let mut symbol = EPSILON.to_string();
    let mut targets = Vec::new();

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::source => source = p.as_str().to_string(),
            Rule::label => symbol = parse_symbol(p.as_str()),
            Rule::targets => targets = parse_items(p),
            _ => {}
        }
    }

    Transition {
        source,
        symbol,
        targets,
    }
}

fn parse_symbol(input: &str) -> String {
    if input.is_empty() {
        EPSILON.to_string()
    } else {
        input.to_string()
    }
}

/// Creates an `AutomatonError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> AutomatonError {
    AutomatonError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}
