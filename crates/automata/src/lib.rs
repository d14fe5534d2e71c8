//!
//! A crate containing the finite automaton model shared by nondeterministic
//! and deterministic recognizers, the determinism check and the subset
//! construction that converts the former into the latter.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod automaton;
mod determinism;
mod random_automaton;
mod snapshot;
mod subset_construction;

pub use automaton::*;
pub use determinism::*;
pub use random_automaton::*;
pub use snapshot::*;
pub use subset_construction::*;
