use std::collections::VecDeque;
use std::time::Instant;

use itertools::Itertools;
use log::debug;
use log::trace;
use rustc_hash::FxHashMap;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::AutomatonError;
use crate::StateIndex;

/// Determines the key that identifies a set of NFA states during the subset construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubsetKey {
    /// The sorted state labels concatenated without a separator.
    ///
    /// Distinct subsets can share a key, for example {1, 23} and {12, 3} are
    /// both keyed by 123, in which case they become the same DFA state and
    /// the resulting DFA is not equivalent to the NFA.
    Concatenated,

    /// The sorted list of state labels, which is distinct for distinct subsets.
    #[default]
    Separated,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Key {
    Concatenated(String),
    Separated(Vec<StateIndex>),
}

impl SubsetKey {
    /// States are sorted by label, so sorted indices compare like sorted labels.
    fn key(&self, nfa: &Automaton, subset: &[StateIndex]) -> Key {
        match self {
            SubsetKey::Concatenated => Key::Concatenated(subset.iter().map(|state| nfa.state_label(*state)).join("")),
            SubsetKey::Separated => Key::Separated(subset.to_vec()),
        }
    }
}

/// The deterministic automaton produced by the subset construction, together
/// with the NFA states that every DFA state represents.
pub struct SubsetConstruction {
    automaton: Automaton,
    subsets: Vec<Vec<String>>,
}

impl SubsetConstruction {
    /// Returns the deterministic automaton.
    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn into_automaton(self) -> Automaton {
        self.automaton
    }

    /// Returns the NFA states of DFA state `s{index}`, sorted by label.
    pub fn subset(&self, index: usize) -> &[String] {
        &self.subsets[index]
    }

    /// Returns the number of discovered subsets, equal to the number of DFA states.
    pub fn num_of_subsets(&self) -> usize {
        self.subsets.len()
    }
}

/// Converts the given automaton into an equivalent deterministic automaton,
/// using [SubsetKey::Separated] keys.
pub fn nfa_to_dfa(nfa: &Automaton) -> Result<Automaton, AutomatonError> {
    Ok(subset_construction(nfa, SubsetKey::default())?.into_automaton())
}

/// Performs the powerset construction over the subsets reachable from the initial state.
///
/// The DFA states are named `s0, s1, ...` in the lexicographic order of the
/// subset keys. The empty subset is a regular (rejecting) state, so the
/// resulting transition function has exactly one destination everywhere. A
/// DFA state is final iff its subset contains a final NFA state.
pub fn subset_construction(nfa: &Automaton, strategy: SubsetKey) -> Result<SubsetConstruction, AutomatonError> {
    let start = Instant::now();

    let initial = vec![nfa.initial_state_index()];
    let initial_key = strategy.key(nfa, &initial);

    // The first subset discovered for every key.
    let mut representatives: FxHashMap<Key, Vec<StateIndex>> = FxHashMap::default();
    // The destination subsets per symbol for every explored key.
    let mut aggregated: FxHashMap<Key, Vec<Vec<StateIndex>>> = FxHashMap::default();

    let mut queue = VecDeque::new();
    representatives.insert(initial_key.clone(), initial.clone());
    queue.push_back(initial);

    while let Some(subset) = queue.pop_front() {
        let mut outgoing = Vec::with_capacity(nfa.num_of_symbols());

        for symbol in nfa.iter_symbols() {
            let mut next: Vec<StateIndex> = subset
                .iter()
                .flat_map(|state| nfa.destinations(*state, symbol))
                .copied()
                .collect();
            next.sort_unstable();
            next.dedup();

            let next_key = strategy.key(nfa, &next);
            if !representatives.contains_key(&next_key) {
                trace!("Discovered subset {next_key:?}");
                representatives.insert(next_key, next.clone());
                queue.push_back(next.clone());
            }

            outgoing.push(next);
        }

        aggregated.insert(strategy.key(nfa, &subset), outgoing);
    }

    // Rename the subsets to s0, s1, etc. in the order of their keys.
    let mut keys: Vec<Key> = aggregated.keys().cloned().collect();
    keys.sort_unstable();

    let names: FxHashMap<Key, String> = keys
        .iter()
        .enumerate()
        .map(|(index, key)| (key.clone(), format!("s{index}")))
        .collect();

    let mut builder = AutomatonBuilder::new()
        .alphabet(nfa.alphabet().iter().cloned())
        .initial_state(names[&initial_key].clone());

    let mut subsets = Vec::with_capacity(keys.len());
    for key in &keys {
        let name = &names[key];
        let representative = &representatives[key];

        builder = builder.state(name.clone());
        if representative.iter().any(|state| nfa.is_final(*state)) {
            builder = builder.final_state(name.clone());
        }

        for (symbol, destination) in nfa.iter_symbols().zip(&aggregated[key]) {
            let destination_name = &names[&strategy.key(nfa, destination)];
            builder = builder.transition(name.clone(), nfa.symbol_label(symbol), [destination_name.clone()]);
        }

        subsets.push(
            representative
                .iter()
                .map(|state| nfa.state_label(*state).to_string())
                .collect(),
        );
    }

    let automaton = builder.build_deterministic()?;

    debug!(
        "Subset construction found {} subsets for {} states",
        subsets.len(),
        nfa.num_of_states()
    );
    debug!("Time subset_construction: {:.3}s", start.elapsed().as_secs_f64());

    Ok(SubsetConstruction { automaton, subsets })
}
