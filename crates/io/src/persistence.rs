use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use log::debug;

use dawg_automata::Automaton;
use dawg_automata::AutomatonSnapshot;

use crate::IOError;

/// Writes the automaton as a JSON snapshot.
pub fn write_automaton(writer: impl Write, automaton: &Automaton) -> Result<(), IOError> {
    serde_json::to_writer_pretty(writer, &AutomatonSnapshot::from(automaton))?;
    Ok(())
}

/// Reads an automaton from a JSON snapshot, checking all invariants of the
/// model including determinism for deterministic snapshots.
pub fn read_automaton(reader: impl Read) -> Result<Automaton, IOError> {
    let snapshot: AutomatonSnapshot = serde_json::from_reader(BufReader::new(reader))?;
    let automaton = Automaton::try_from(snapshot)?;

    debug!(
        "Read {:?} automaton with {} states, {} symbols and {} transitions",
        automaton.kind(),
        automaton.num_of_states(),
        automaton.num_of_symbols(),
        automaton.num_of_transitions()
    );
    Ok(automaton)
}

pub fn save_automaton(path: impl AsRef<Path>, automaton: &Automaton) -> Result<(), IOError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_automaton(&mut writer, automaton)?;
    writer.flush()?;

    debug!("Saved automaton to {}", path.as_ref().display());
    Ok(())
}

pub fn load_automaton(path: impl AsRef<Path>) -> Result<Automaton, IOError> {
    read_automaton(File::open(path)?)
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use dawg_automata::random_automaton;
    use dawg_automata::AutomatonBuilder;
    use dawg_automata::AutomatonError;
    use dawg_automata::AutomatonKind;

    use super::*;

    #[test]
    fn test_write_then_read() {
        let automaton = random_automaton(20, 3, 2);

        let mut buffer = Vec::new();
        write_automaton(&mut buffer, &automaton).unwrap();
        let result = read_automaton(&buffer[..]).unwrap();

        assert_eq!(result, automaton);
    }

    #[test]
    fn test_kind_is_stored() {
        let automaton = AutomatonBuilder::new()
            .states(["p", "q"])
            .alphabet(["a"])
            .initial_state("p")
            .final_state("q")
            .transition("p", "a", ["q"])
            .build_deterministic()
            .unwrap();

        let mut buffer = Vec::new();
        write_automaton(&mut buffer, &automaton).unwrap();

        assert_eq!(read_automaton(&buffer[..]).unwrap().kind(), AutomatonKind::Deterministic);
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() {
        let text = r#"{
            "kind": "Deterministic",
            "states": ["p", "q"],
            "alphabet": ["a"],
            "initial_state": "p",
            "final_states": ["q"],
            "transitions": [{"origin": "p", "symbol": "a", "destinations": ["p", "q"]}]
        }"#;

        assert!(matches!(
            read_automaton(text.as_bytes()),
            Err(IOError::Automaton(AutomatonError::Determinism(_)))
        ));
    }

    #[test]
    fn test_malformed_snapshot() {
        assert!(matches!(read_automaton("{\"kind\": 3".as_bytes()), Err(IOError::Snapshot(_))));
    }
}
