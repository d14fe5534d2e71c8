use rand::Rng;

use crate::Automaton;
use crate::AutomatonBuilder;

/// Generates a nondeterministic automaton with the desired number of states,
/// input symbols and maximum out degree for all the states.
///
/// States are labelled by their number and symbols are lower case letters.
pub fn random_automaton(num_of_states: usize, num_of_symbols: u32, outdegree: usize) -> Automaton {
    assert!(num_of_states > 0, "An automaton needs at least one state");
    assert!(num_of_symbols <= 26, "Symbols are single lower case letters");

    let states: Vec<String> = (0..num_of_states).map(|state| state.to_string()).collect();
    let alphabet: Vec<String> = (0..num_of_symbols)
        .map(|i| char::from_digit(i + 10, 36).unwrap().to_string())
        .collect();

    let mut rng = rand::rng();
    let mut builder = AutomatonBuilder::new()
        .states(states.iter().cloned())
        .alphabet(alphabet.iter().cloned())
        .initial_state(states[0].clone());

    for state in &states {
        if rng.random_bool(0.3) {
            builder = builder.final_state(state.clone());
        }

        // Introduce outgoing transitions for this state based on the desired out degree.
        if num_of_symbols > 0 {
            for _ in 0..rng.random_range(0..=outdegree) {
                let symbol = &alphabet[rng.random_range(0..alphabet.len())];
                let to = &states[rng.random_range(0..num_of_states)];
                builder = builder.add_transition(state.clone(), symbol.clone(), to.clone());
            }
        }
    }

    builder
        .build()
        .expect("Generated states and symbols are always declared")
}
