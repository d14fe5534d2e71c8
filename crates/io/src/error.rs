use thiserror::Error;

use dawg_automata::AutomatonError;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("Invalid transition {0}, expected <origin>-<symbol>-<destination>,...")]
    InvalidTransition(String),

    #[error("The {0} must be provided")]
    MissingField(&'static str),

    #[error("Invalid row {0}, expected <label>,<word>")]
    InvalidRow(String),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error("Invalid automaton snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
