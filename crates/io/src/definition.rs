use log::debug;
use log::trace;
use regex::Regex;

use dawg_automata::Automaton;
use dawg_automata::AutomatonBuilder;
use dawg_automata::AutomatonKind;

use crate::IOError;

/// A single `origin-symbol-dest1,dest2,...` entry of a transition table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionSpec {
    pub origin: String,
    pub symbol: String,
    pub destinations: Vec<String>,
}

/// Parses transition entries of the form `origin-symbol-dest1,dest2,...`.
pub struct TransitionParser {
    regex: Regex,
}

impl TransitionParser {
    pub fn new() -> TransitionParser {
        TransitionParser {
            regex: Regex::new(r"^\s*([^-\s]+)\s*-\s*([^-\s]+)\s*-([^-]+)$")
                .expect("Regex compilation should not fail"),
        }
    }

    pub fn parse(&self, entry: &str) -> Result<TransitionSpec, IOError> {
        let (_, [origin, symbol, destinations]) = self
            .regex
            .captures(entry)
            .ok_or_else(|| IOError::InvalidTransition(entry.to_string()))?
            .extract();

        let destinations = parse_list(destinations);
        if destinations.is_empty() {
            return Err(IOError::InvalidTransition(entry.to_string()));
        }

        trace!("Parsed transition {origin} x {symbol} -> {destinations:?}");
        Ok(TransitionSpec {
            origin: origin.to_string(),
            symbol: symbol.to_string(),
            destinations,
        })
    }
}

impl Default for TransitionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// An automaton as specified on the command line, before the invariants of
/// the model have been checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomatonDefinition {
    pub states: Vec<String>,
    pub symbols: Vec<String>,
    pub initial_state: String,
    pub final_states: Vec<String>,
    pub transitions: Vec<TransitionSpec>,
}

impl AutomatonDefinition {
    /// Parses the comma separated lists of states, symbols and final states,
    /// and the transition entries. Every part must be present.
    pub fn parse<S: AsRef<str>>(
        states: &str,
        symbols: &str,
        initial_state: &str,
        final_states: &str,
        transitions: &[S],
    ) -> Result<AutomatonDefinition, IOError> {
        let states = non_empty(parse_list(states), "states")?;
        let symbols = non_empty(parse_list(symbols), "input symbols")?;
        let final_states = non_empty(parse_list(final_states), "final states")?;

        let initial_state = initial_state.trim();
        if initial_state.is_empty() {
            return Err(IOError::MissingField("initial state"));
        }

        let parser = TransitionParser::new();
        let transitions = transitions
            .iter()
            .map(|entry| parser.parse(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let transitions = non_empty(transitions, "transitions")?;

        Ok(AutomatonDefinition {
            states,
            symbols,
            initial_state: initial_state.to_string(),
            final_states,
            transitions,
        })
    }

    /// Builds the automaton, where a later entry for the same state and
    /// symbol replaces an earlier one.
    pub fn into_automaton(self, kind: AutomatonKind) -> Result<Automaton, IOError> {
        let mut builder = AutomatonBuilder::new()
            .states(self.states)
            .alphabet(self.symbols)
            .initial_state(self.initial_state)
            .final_states(self.final_states);

        for spec in self.transitions {
            builder = builder.transition(spec.origin, spec.symbol, spec.destinations);
        }

        let automaton = builder.build_with_kind(kind)?;
        debug!(
            "Defined automaton with {} states and {} transitions",
            automaton.num_of_states(),
            automaton.num_of_transitions()
        );
        Ok(automaton)
    }
}

/// Splits a comma separated list, ignoring surrounding whitespace and empty items.
pub fn parse_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty<T>(list: Vec<T>, field: &'static str) -> Result<Vec<T>, IOError> {
    if list.is_empty() {
        Err(IOError::MissingField(field))
    } else {
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use dawg_automata::AutomatonError;

    use super::*;

    #[test_log::test]
    fn test_parse_transition() {
        let spec = TransitionParser::new().parse("q0-1-q0,q1").unwrap();

        assert_eq!(spec.origin, "q0");
        assert_eq!(spec.symbol, "1");
        assert_eq!(spec.destinations, vec!["q0", "q1"]);
    }

    #[test_case("q0-1" ; "missing destinations")]
    #[test_case("q0-1-" ; "empty destinations")]
    #[test_case("q0-1-,," ; "only separators")]
    #[test_case("-1-q0" ; "empty origin")]
    #[test_case("q0--q1" ; "empty symbol")]
    #[test_case("q0-1-q1-q2" ; "too many segments")]
    fn test_invalid_transition(entry: &str) {
        assert!(matches!(
            TransitionParser::new().parse(entry),
            Err(IOError::InvalidTransition(_))
        ));
    }

    #[test_log::test]
    fn test_third_last_definition() {
        let definition = AutomatonDefinition::parse(
            "q0,q1,q2,q3",
            "0,1",
            "q0",
            "q3",
            &["q0-0-q0", "q0-1-q0,q1", "q1-0-q2", "q1-1-q2", "q2-0-q3", "q2-1-q3"],
        )
        .unwrap();

        let automaton = definition.into_automaton(AutomatonKind::Nondeterministic).unwrap();
        assert!(automaton.accepts_str("100"));
        assert!(automaton.accepts_str("0110"));
        assert!(!automaton.accepts_str("000"));
        assert!(!automaton.accepts_str("10"));
    }

    #[test_log::test]
    fn test_later_entry_overwrites() {
        let definition = AutomatonDefinition::parse("q0,q1", "a", "q0", "q1", &["q0-a-q0", "q0-a-q1"]).unwrap();
        let automaton = definition.into_automaton(AutomatonKind::Deterministic).unwrap();

        assert!(automaton.accepts_str("a"));
        assert!(!automaton.accepts_str("aa"));
    }

    #[test_case("", "a", "q0", "q0", &["q0-a-q0"], "states" ; "states")]
    #[test_case("q0", " ", "q0", "q0", &["q0-a-q0"], "input symbols" ; "symbols")]
    #[test_case("q0", "a", "", "q0", &["q0-a-q0"], "initial state" ; "initial")]
    #[test_case("q0", "a", "q0", ",", &["q0-a-q0"], "final states" ; "final")]
    #[test_case("q0", "a", "q0", "q0", &[], "transitions" ; "transitions")]
    fn test_missing_field(states: &str, symbols: &str, initial: &str, finals: &str, transitions: &[&str], field: &str) {
        match AutomatonDefinition::parse(states, symbols, initial, finals, transitions) {
            Err(IOError::MissingField(missing)) => assert_eq!(missing, field),
            result => panic!("Expected a missing {field}, got {result:?}"),
        }
    }

    #[test_log::test]
    fn test_deterministic_definition_rejects_multiple_destinations() {
        let definition = AutomatonDefinition::parse("q0,q1", "a", "q0", "q1", &["q0-a-q0,q1"]).unwrap();

        assert!(matches!(
            definition.into_automaton(AutomatonKind::Deterministic),
            Err(IOError::Automaton(AutomatonError::Determinism(_)))
        ));
    }

    #[test_log::test]
    fn test_unknown_destination() {
        let definition = AutomatonDefinition::parse("q0", "a", "q0", "q0", &["q0-a-q5"]).unwrap();

        assert!(matches!(
            definition.into_automaton(AutomatonKind::Nondeterministic),
            Err(IOError::Automaton(AutomatonError::UnknownState(_)))
        ));
    }
}
