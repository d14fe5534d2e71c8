use thiserror::Error;

use crate::Automaton;

/// A state and symbol with more than one destination in an automaton that must be deterministic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("DFA can't have more than one destination state in transitions, {state} x {symbol} has {count}")]
pub struct DeterminismViolation {
    pub state: String,
    pub symbol: String,
    pub count: usize,
}

/// Checks that every state and symbol of the automaton has at most one destination.
///
/// Reports the first violating pair in state and symbol order.
pub fn validate_determinism(automaton: &Automaton) -> Result<(), DeterminismViolation> {
    for state in automaton.iter_states() {
        for symbol in automaton.iter_symbols() {
            let count = automaton.destinations(state, symbol).len();
            if count > 1 {
                return Err(DeterminismViolation {
                    state: automaton.state_label(state).to_string(),
                    symbol: automaton.symbol_label(symbol).to_string(),
                    count,
                });
            }
        }
    }

    Ok(())
}
