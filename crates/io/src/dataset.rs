//! Reading the word lists that are used to train and evaluate an automaton.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use log::trace;
use regex::Captures;
use regex::Regex;
use streaming_iterator::StreamingIterator;

use crate::IOError;
use crate::LineIterator;

/// The positive and negative example words of a training set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainingSet {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

/// Settings for interpreting a labelled test set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestSetConfig {
    /// The label of the rows that should be accepted.
    pub positive_label: String,
}

impl Default for TestSetConfig {
    fn default() -> Self {
        TestSetConfig {
            positive_label: "amyloid".to_string(),
        }
    }
}

/// A word of the test set, together with whether it should be accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledWord {
    pub positive: bool,
    pub word: String,
}

/// Reads a training set with one word per line, where lines containing a `+`
/// are positive examples.
pub fn read_training_set(reader: impl Read) -> Result<TrainingSet, IOError> {
    let mut lines = LineIterator::new(reader);
    let mut result = TrainingSet::default();

    while let Some(line) = lines.next() {
        let word: String = line.chars().filter(|c| *c != '\t').collect();
        if word.contains('+') {
            let word = word.replace('+', "");
            if !word.is_empty() {
                result.positive.push(word);
            }
        } else if !word.is_empty() {
            result.negative.push(word);
        }
    }

    if let Some(error) = lines.take_error() {
        return Err(error.into());
    }

    debug!(
        "Read training set with {} positive and {} negative words",
        result.positive.len(),
        result.negative.len()
    );
    Ok(result)
}

/// Reads a comma separated test set. The first row is a header, every other
/// row starts with a label followed by the word.
///
/// Fields can be quoted, in which case they may contain commas and `""`
/// stands for a single quote.
pub fn read_test_set(reader: impl Read, config: &TestSetConfig) -> Result<Vec<LabeledWord>, IOError> {
    // The first two columns, each either quoted or plain. Further columns are ignored.
    let row = Regex::new(
        r#"^\s*(?:"((?:[^"]|"")*)"|([^,"]*))\s*,\s*(?:"((?:[^"]|"")*)"|([^,"]*))\s*(?:,.*)?$"#,
    )
    .expect("Regex compilation should not fail");

    let mut lines = LineIterator::new(reader);
    let mut result = Vec::new();

    // Skip the header.
    lines.advance();

    loop {
        lines.advance();
        let Some(line) = lines.get() else {
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let captures = row.captures(line).ok_or_else(|| IOError::InvalidRow(line.clone()))?;
        let label = field(&captures, 1, 2);
        let word = field(&captures, 3, 4);

        trace!("Row {}: {label} {word}", lines.line_number());
        result.push(LabeledWord {
            positive: label == config.positive_label,
            word,
        });
    }

    if let Some(error) = lines.take_error() {
        return Err(error.into());
    }

    debug!("Read test set with {} words", result.len());
    Ok(result)
}

/// Returns the unescaped content of a quoted field, or the trimmed plain field.
fn field(captures: &Captures, quoted: usize, plain: usize) -> String {
    match captures.get(quoted) {
        Some(content) => content.as_str().replace("\"\"", "\""),
        None => captures
            .get(plain)
            .map_or("", |content| content.as_str())
            .trim()
            .to_string(),
    }
}

pub fn load_training_set(path: impl AsRef<Path>) -> Result<TrainingSet, IOError> {
    read_training_set(File::open(path)?)
}

pub fn load_test_set(path: impl AsRef<Path>, config: &TestSetConfig) -> Result<Vec<LabeledWord>, IOError> {
    read_test_set(File::open(path)?, config)
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_log::test]
    fn test_training_set() {
        let text = "STVIIE+\nKLVFFA\t\n\n\tNNQQNY +\r\nGGVVIA\n+\n";
        let set = read_training_set(text.as_bytes()).unwrap();

        assert_eq!(set.positive, vec!["STVIIE", "NNQQNY "]);
        assert_eq!(set.negative, vec!["KLVFFA", "GGVVIA"]);
    }

    #[test_log::test]
    fn test_test_set() {
        let text = "class,sequence\namyloid,STVIIE\nnon-amyloid,KLVFFA\n\"amyloid\",\"NNQQNY\",extra\n\n";
        let words = read_test_set(text.as_bytes(), &TestSetConfig::default()).unwrap();

        assert_eq!(
            words,
            vec![
                LabeledWord {
                    positive: true,
                    word: "STVIIE".to_string()
                },
                LabeledWord {
                    positive: false,
                    word: "KLVFFA".to_string()
                },
                LabeledWord {
                    positive: true,
                    word: "NNQQNY".to_string()
                },
            ]
        );
    }

    #[test_log::test]
    fn test_quoted_field_with_comma() {
        let text = "label,word\namyloid,\"AB,C\"\nother,\"say \"\"hi\"\"\", 3\n";
        let words = read_test_set(text.as_bytes(), &TestSetConfig::default()).unwrap();

        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "AB,C");
        assert!(words[0].positive);
        assert_eq!(words[1].word, "say \"hi\"");
        assert!(!words[1].positive);
    }

    #[test_case("amyloid,A\"B" ; "quote inside plain field")]
    #[test_case("amyloid,\"AB\"C" ; "text after closing quote")]
    #[test_case("amyloid,\"AB" ; "unterminated quote")]
    fn test_malformed_quotes(row: &str) {
        let text = format!("label,word\n{row}\n");

        match read_test_set(text.as_bytes(), &TestSetConfig::default()) {
            Err(IOError::InvalidRow(invalid)) => assert_eq!(invalid, row),
            result => panic!("Expected an invalid row, got {result:?}"),
        }
    }

    #[test_case("yes", 1 ; "custom label")]
    #[test_case("amyloid", 0 ; "default label")]
    fn test_positive_label(label: &str, expected: usize) {
        let text = "label,word\nyes,ab\nno,ba\n";
        let config = TestSetConfig {
            positive_label: label.to_string(),
        };

        let words = read_test_set(text.as_bytes(), &config).unwrap();
        assert_eq!(words.iter().filter(|word| word.positive).count(), expected);
    }

    #[test_log::test]
    fn test_row_without_word() {
        let text = "label,word\namyloid\n";

        match read_test_set(text.as_bytes(), &TestSetConfig::default()) {
            Err(IOError::InvalidRow(row)) => assert_eq!(row, "amyloid"),
            result => panic!("Expected an invalid row, got {result:?}"),
        }
    }
}
