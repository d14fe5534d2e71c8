use log::info;
use log::warn;

use dawg_automata::split_symbols;
use dawg_automata::Automaton;

use crate::exact_automaton;
use crate::extract_edges;
use crate::induce;
use crate::rank_edges;
use crate::InductionConfig;
use crate::InductionError;
use crate::InductionReport;
use crate::Word;
use crate::WordTrie;

/// Learns an automaton from the positive and negative example texts, every
/// character being one input symbol.
///
/// The result accepts every positive word, and rejects every negative word
/// that is not also a positive word.
pub fn train<S: AsRef<str>>(
    positive: &[S],
    negative: &[S],
    config: &InductionConfig,
) -> Result<(Automaton, InductionReport), InductionError> {
    let positive: Vec<Word> = positive.iter().map(|text| split_symbols(text.as_ref()).collect()).collect();
    let negative: Vec<Word> = negative.iter().map(|text| split_symbols(text.as_ref()).collect()).collect();

    train_words(&positive, &negative, config)
}

/// Learns an automaton from positive and negative words of arbitrary symbols.
pub fn train_words(
    positive: &[Word],
    negative: &[Word],
    config: &InductionConfig,
) -> Result<(Automaton, InductionReport), InductionError> {
    info!(
        "Creating DAWG from {} positive and {} negative words",
        positive.len(),
        negative.len()
    );

    let trie = WordTrie::from_words(positive);

    let conflicts = negative.iter().filter(|word| trie.contains(*word)).count();
    if conflicts > 0 {
        warn!("{conflicts} negative words are also positive words, no transition can be added");
    }

    let graph = extract_edges(&trie);
    let ranked = rank_edges(&graph);

    let mut automaton = exact_automaton(&graph)?;
    let report = induce(&mut automaton, &graph, &ranked, negative, config)?;

    info!(
        "Kept {} of {} candidate transitions, the automaton has {} states and {} transitions",
        report.kept,
        report.candidates,
        automaton.num_of_states(),
        automaton.num_of_transitions()
    );

    Ok((automaton, report))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use dawg_automata::nfa_to_dfa;

    use super::*;

    #[test_case(&["ab", "ac"], &["a", "b", "c", "aa", "abc"] ; "branch")]
    #[test_case(&["ab", "aab", "aaab", "b"], &["a", "ba", "aa", "bb"] ; "repetition")]
    #[test_case(&["kvfi", "kvfl", "gvfi", "avya", "kkfa"], &["kvvi", "gffl", "aaaa", "k", "vf"] ; "sequences")]
    fn test_train(positive: &[&str], negative: &[&str]) {
        let (automaton, report) = train(positive, negative, &InductionConfig::default()).unwrap();

        assert_eq!(report.candidates, report.kept + report.rolled_back);
        for word in positive {
            assert!(automaton.accepts_str(word), "Positive word {word} rejected");
        }
        for word in negative {
            assert!(!automaton.accepts_str(word), "Negative word {word} accepted");
        }

        // The determinized automaton recognizes the same examples.
        let dfa = nfa_to_dfa(&automaton).unwrap();
        for word in positive.iter().chain(negative) {
            assert_eq!(dfa.accepts_str(word), automaton.accepts_str(word));
        }
    }

    #[test_log::test]
    fn test_train_without_positive_words() {
        let (automaton, report) = train::<&str>(&[], &["a"], &InductionConfig::default()).unwrap();

        assert_eq!(report, InductionReport::default());
        assert!(!automaton.accepts_str(""));
        assert!(!automaton.accepts_str("a"));
    }

    #[test_log::test]
    fn test_conflicting_words_prevent_generalization() {
        let positive: &[&str] = &["ab", "ac", "bc"];
        let (automaton, report) = train(positive, &["ab", "b"], &InductionConfig::default()).unwrap();

        assert!(automaton.accepts_str("ab"));
        assert!(!automaton.accepts_str("b"));

        // The accepted negative word makes every candidate fail.
        assert!(report.candidates > 0);
        assert_eq!(report.kept, 0);
        assert_eq!(report.rolled_back, report.candidates);
        assert_eq!(automaton.num_of_transitions(), exact_automaton_transitions(positive));
    }

    fn exact_automaton_transitions(positive: &[&str]) -> usize {
        let words: Vec<Word> = positive.iter().map(|text| split_symbols(text).collect()).collect();
        let graph = extract_edges(&WordTrie::from_words(&words));
        exact_automaton(&graph).unwrap().num_of_transitions()
    }
}
