use std::collections::BTreeMap;
use std::fmt;
use std::mem::swap;

use itertools::Itertools;
use log::trace;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::validate_determinism;
use crate::DeterminismViolation;

/// The index for a state.
pub type StateIndex = usize;

/// The index type for an input symbol.
pub type SymbolIndex = usize;

/// Whether an automaton is allowed to have multiple destinations for a state and symbol.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutomatonKind {
    #[default]
    Nondeterministic,
    Deterministic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("An automaton needs at least one state")]
    NoStates,

    #[error("An initial state must be provided")]
    MissingInitialState,

    #[error("Initial state {0} is not one of the states")]
    UnknownInitialState(String),

    #[error("State {0} is not one of the states")]
    UnknownState(String),

    #[error("Symbol {0} is not one of the input symbols")]
    UnknownSymbol(String),

    #[error(transparent)]
    Determinism(#[from] DeterminismViolation),
}

/// A finite automaton over string labelled states and input symbols.
///
/// The transition function is total: every state and input symbol has a
/// (possibly empty) set of destinations. States and symbols are stored
/// sorted, and are addressed by their index in that order.
#[derive(Clone, PartialEq, Eq)]
pub struct Automaton {
    states: Vec<String>,
    state_indices: FxHashMap<String, StateIndex>,

    alphabet: Vec<String>,
    symbol_indices: FxHashMap<String, SymbolIndex>,

    initial_state: StateIndex,
    final_states: Vec<bool>,

    /// The sorted destinations of state s and symbol a at s * |alphabet| + a.
    transitions: Vec<Vec<StateIndex>>,

    kind: AutomatonKind,
}

/// The destinations of a single (state, symbol) pair before a transition was added.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "the undo record is needed to roll the addition back"]
pub struct TransitionUndo {
    state: StateIndex,
    symbol: SymbolIndex,
    previous: Vec<StateIndex>,
}

impl TransitionUndo {
    /// Returns true iff the addition did not change the destinations.
    pub fn is_noop(&self, automaton: &Automaton) -> bool {
        automaton.destinations(self.state, self.symbol) == self.previous.as_slice()
    }
}

impl Automaton {
    /// Returns true iff the automaton accepts the given sequence of input symbols.
    ///
    /// Symbols that are not part of the alphabet lead to a rejection.
    pub fn accepts<I>(&self, word: I) -> bool
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut current = vec![self.initial_state];
        let mut next = Vec::new();

        for symbol in word {
            let Some(&symbol_index) = self.symbol_indices.get(symbol.as_ref()) else {
                return false;
            };

            next.clear();
            for &state in &current {
                next.extend_from_slice(self.destinations(state, symbol_index));
            }
            next.sort_unstable();
            next.dedup();

            swap(&mut current, &mut next);
            if current.is_empty() {
                // No final state can be reached anymore.
                return false;
            }
        }

        current.iter().any(|state| self.final_states[*state])
    }

    /// Accepts the word formed by the characters of the given text, every character being one symbol.
    pub fn accepts_str(&self, text: &str) -> bool {
        self.accepts(split_symbols(text))
    }

    /// Returns the destinations for the given state and symbol.
    pub fn destinations(&self, state: StateIndex, symbol: SymbolIndex) -> &[StateIndex] {
        &self.transitions[self.transition_index(state, symbol)]
    }

    /// Adds the destination to the transitions of the given state and symbol.
    ///
    /// Returns a record of the previous destinations that can be passed to
    /// [Automaton::undo]. Fails when a deterministic automaton would get a
    /// second destination.
    pub fn add_transition(
        &mut self,
        state: StateIndex,
        symbol: SymbolIndex,
        destination: StateIndex,
    ) -> Result<TransitionUndo, DeterminismViolation> {
        debug_assert!(destination < self.num_of_states(), "Destination {destination} is not a state");

        let index = self.transition_index(state, symbol);
        let previous = self.transitions[index].clone();

        if let Err(position) = previous.binary_search(&destination) {
            if self.kind == AutomatonKind::Deterministic && !previous.is_empty() {
                return Err(DeterminismViolation {
                    state: self.states[state].clone(),
                    symbol: self.alphabet[symbol].clone(),
                    count: previous.len() + 1,
                });
            }

            self.transitions[index].insert(position, destination);
            trace!(
                "Added transition {} x {} -> {}",
                self.states[state],
                self.alphabet[symbol],
                self.states[destination]
            );
        }

        Ok(TransitionUndo {
            state,
            symbol,
            previous,
        })
    }

    /// Restores the destinations recorded before the corresponding [Automaton::add_transition].
    pub fn undo(&mut self, undo: TransitionUndo) {
        let index = self.transition_index(undo.state, undo.symbol);
        self.transitions[index] = undo.previous;
    }

    /// Returns the index of the initial state.
    pub fn initial_state_index(&self) -> StateIndex {
        self.initial_state
    }

    /// Returns the label of the initial state.
    pub fn initial_state(&self) -> &str {
        &self.states[self.initial_state]
    }

    /// Returns true iff the given state is a final state.
    pub fn is_final(&self, state: StateIndex) -> bool {
        self.final_states[state]
    }

    /// Iterate over the labels of the final states, in sorted order.
    pub fn final_states(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter_states()
            .filter(|state| self.final_states[*state])
            .map(|state| self.states[state].as_str())
    }

    /// Returns the sorted state labels.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Returns the sorted input symbols.
    pub fn alphabet(&self) -> &[String] {
        &self.alphabet
    }

    /// Returns the label of the given state.
    pub fn state_label(&self, state: StateIndex) -> &str {
        &self.states[state]
    }

    /// Returns the label of the given symbol.
    pub fn symbol_label(&self, symbol: SymbolIndex) -> &str {
        &self.alphabet[symbol]
    }

    /// Returns the index of the state with the given label.
    pub fn state_index(&self, label: &str) -> Option<StateIndex> {
        self.state_indices.get(label).copied()
    }

    /// Returns the index of the symbol with the given label.
    pub fn symbol_index(&self, label: &str) -> Option<SymbolIndex> {
        self.symbol_indices.get(label).copied()
    }

    /// Iterate over all state indices.
    pub fn iter_states(&self) -> impl Iterator<Item = StateIndex> {
        0..self.states.len()
    }

    /// Iterate over all symbol indices.
    pub fn iter_symbols(&self) -> impl Iterator<Item = SymbolIndex> {
        0..self.alphabet.len()
    }

    /// Returns the number of states.
    pub fn num_of_states(&self) -> usize {
        self.states.len()
    }

    /// Returns the number of input symbols.
    pub fn num_of_symbols(&self) -> usize {
        self.alphabet.len()
    }

    /// Returns the number of (state, symbol, destination) triples.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions.iter().map(Vec::len).sum()
    }

    /// Returns the tag with which the automaton was constructed.
    pub fn kind(&self) -> AutomatonKind {
        self.kind
    }

    /// Returns true iff every state and symbol has at most one destination.
    pub fn is_deterministic(&self) -> bool {
        self.transitions.iter().all(|destinations| destinations.len() <= 1)
    }

    fn transition_index(&self, state: StateIndex, symbol: SymbolIndex) -> usize {
        debug_assert!(state < self.states.len(), "State index {state} out of bounds");
        debug_assert!(symbol < self.alphabet.len(), "Symbol index {symbol} out of bounds");
        state * self.alphabet.len() + symbol
    }
}

/// Splits a text into its characters, each becoming a single input symbol.
pub fn split_symbols(text: &str) -> impl Iterator<Item = String> + '_ {
    text.chars().map(String::from)
}

/// Collects the states, symbols and transitions of an automaton and checks
/// them before the automaton is created.
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    states: Vec<String>,
    alphabet: Vec<String>,
    initial_state: Option<String>,
    final_states: Vec<String>,
    transitions: BTreeMap<(String, String), Vec<String>>,
}

impl AutomatonBuilder {
    pub fn new() -> AutomatonBuilder {
        AutomatonBuilder::default()
    }

    pub fn state(mut self, label: impl Into<String>) -> Self {
        self.states.push(label.into());
        self
    }

    pub fn states<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.states.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn symbol(mut self, label: impl Into<String>) -> Self {
        self.alphabet.push(label.into());
        self
    }

    pub fn alphabet<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.alphabet.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn initial_state(mut self, label: impl Into<String>) -> Self {
        self.initial_state = Some(label.into());
        self
    }

    pub fn final_state(mut self, label: impl Into<String>) -> Self {
        self.final_states.push(label.into());
        self
    }

    pub fn final_states<I>(mut self, labels: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.final_states.extend(labels.into_iter().map(Into::into));
        self
    }

    /// Sets the destinations of the given origin and symbol, replacing earlier ones.
    pub fn transition<I>(mut self, origin: impl Into<String>, symbol: impl Into<String>, destinations: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.transitions.insert(
            (origin.into(), symbol.into()),
            destinations.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Adds a destination to the given origin and symbol, keeping earlier ones.
    pub fn add_transition(
        mut self,
        origin: impl Into<String>,
        symbol: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        self.transitions
            .entry((origin.into(), symbol.into()))
            .or_default()
            .push(destination.into());
        self
    }

    /// Creates a nondeterministic automaton.
    pub fn build(self) -> Result<Automaton, AutomatonError> {
        self.build_with_kind(AutomatonKind::Nondeterministic)
    }

    /// Creates a deterministic automaton, failing when a state and symbol have multiple destinations.
    pub fn build_deterministic(self) -> Result<Automaton, AutomatonError> {
        self.build_with_kind(AutomatonKind::Deterministic)
    }

    pub fn build_with_kind(self, kind: AutomatonKind) -> Result<Automaton, AutomatonError> {
        let states = sorted_unique(self.states);
        if states.is_empty() {
            return Err(AutomatonError::NoStates);
        }
        let alphabet = sorted_unique(self.alphabet);

        let state_indices: FxHashMap<String, StateIndex> = states
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();
        let symbol_indices: FxHashMap<String, SymbolIndex> = alphabet
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();

        let initial_label = self.initial_state.ok_or(AutomatonError::MissingInitialState)?;
        let initial_state = *state_indices
            .get(&initial_label)
            .ok_or_else(|| AutomatonError::UnknownInitialState(initial_label.clone()))?;

        let mut final_states = vec![false; states.len()];
        for label in &self.final_states {
            let state = lookup_state(&state_indices, label)?;
            final_states[state] = true;
        }

        let mut transitions: Vec<Vec<StateIndex>> = vec![Vec::new(); states.len() * alphabet.len()];
        for ((origin, symbol), destinations) in &self.transitions {
            let origin_index = lookup_state(&state_indices, origin)?;
            let symbol_index = *symbol_indices
                .get(symbol)
                .ok_or_else(|| AutomatonError::UnknownSymbol(symbol.clone()))?;

            let entry = &mut transitions[origin_index * alphabet.len() + symbol_index];
            for destination in destinations {
                entry.push(lookup_state(&state_indices, destination)?);
            }
            entry.sort_unstable();
            entry.dedup();
        }

        let automaton = Automaton {
            states,
            state_indices,
            alphabet,
            symbol_indices,
            initial_state,
            final_states,
            transitions,
            kind,
        };

        if kind == AutomatonKind::Deterministic {
            validate_determinism(&automaton)?;
        }

        Ok(automaton)
    }
}

fn sorted_unique(mut labels: Vec<String>) -> Vec<String> {
    labels.sort_unstable();
    labels.dedup();
    labels
}

fn lookup_state(state_indices: &FxHashMap<String, StateIndex>, label: &str) -> Result<StateIndex, AutomatonError> {
    state_indices
        .get(label)
        .copied()
        .ok_or_else(|| AutomatonError::UnknownState(label.to_string()))
}

impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "States: {}", quoted_list(&self.states))?;
        writeln!(f, "Input Symbols: {}", quoted_list(&self.alphabet))?;
        writeln!(f, "Initial State: {}", self.initial_state())?;
        writeln!(f, "Final States: {}", quoted_list(self.final_states()))?;
        write!(f, "Transitions:")?;

        for state in self.iter_states() {
            for symbol in self.iter_symbols() {
                let destinations: Vec<&str> = self
                    .destinations(state, symbol)
                    .iter()
                    .map(|to| self.states[*to].as_str())
                    .collect();

                if destinations.is_empty() {
                    continue;
                }

                write!(f, "\n{} x {} -> ", self.states[state], self.alphabet[symbol])?;
                if self.kind == AutomatonKind::Deterministic {
                    write!(f, "{}", destinations[0])?;
                } else {
                    write!(f, "{}", quoted_list(&destinations))?;
                }
            }
        }

        Ok(())
    }
}

/// Formats the labels as `['a', 'b']`.
fn quoted_list<I>(labels: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    format!("[{}]", labels.into_iter().map(|label| format!("'{label}'")).join(", "))
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kind: {:?}", self.kind)?;
        writeln!(f, "Initial state: {}", self.initial_state())?;
        writeln!(f, "Number of transitions: {}", self.num_of_transitions())?;

        for state in self.iter_states() {
            for symbol in self.iter_symbols() {
                for to in self.destinations(state, symbol) {
                    writeln!(f, "{} --[{}]-> {}", self.states[state], self.alphabet[symbol], self.states[*to])?;
                }
            }
        }

        Ok(())
    }
}
