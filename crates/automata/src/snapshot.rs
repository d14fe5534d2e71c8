use serde::Deserialize;
use serde::Serialize;

use crate::Automaton;
use crate::AutomatonBuilder;
use crate::AutomatonError;
use crate::AutomatonKind;

/// A label based copy of an automaton that can be serialized.
///
/// Converting it back into an [Automaton] checks all invariants again, so a
/// modified or corrupted snapshot cannot produce an invalid automaton.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatonSnapshot {
    pub kind: AutomatonKind,
    pub states: Vec<String>,
    pub alphabet: Vec<String>,
    pub initial_state: String,
    pub final_states: Vec<String>,
    pub transitions: Vec<TransitionEntry>,
}

/// The destinations of one state and symbol, omitted when empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionEntry {
    pub origin: String,
    pub symbol: String,
    pub destinations: Vec<String>,
}

impl From<&Automaton> for AutomatonSnapshot {
    fn from(automaton: &Automaton) -> Self {
        let mut transitions = Vec::new();
        for state in automaton.iter_states() {
            for symbol in automaton.iter_symbols() {
                let destinations = automaton.destinations(state, symbol);
                if destinations.is_empty() {
                    continue;
                }

                transitions.push(TransitionEntry {
                    origin: automaton.state_label(state).to_string(),
                    symbol: automaton.symbol_label(symbol).to_string(),
                    destinations: destinations
                        .iter()
                        .map(|to| automaton.state_label(*to).to_string())
                        .collect(),
                });
            }
        }

        AutomatonSnapshot {
            kind: automaton.kind(),
            states: automaton.states().to_vec(),
            alphabet: automaton.alphabet().to_vec(),
            initial_state: automaton.initial_state().to_string(),
            final_states: automaton.final_states().map(str::to_string).collect(),
            transitions,
        }
    }
}

impl TryFrom<AutomatonSnapshot> for Automaton {
    type Error = AutomatonError;

    fn try_from(snapshot: AutomatonSnapshot) -> Result<Self, Self::Error> {
        let mut builder = AutomatonBuilder::new()
            .states(snapshot.states)
            .alphabet(snapshot.alphabet)
            .initial_state(snapshot.initial_state)
            .final_states(snapshot.final_states);

        for entry in snapshot.transitions {
            builder = builder.transition(entry.origin, entry.symbol, entry.destinations);
        }

        builder.build_with_kind(snapshot.kind)
    }
}
