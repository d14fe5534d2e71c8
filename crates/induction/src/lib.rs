//!
//! A crate that learns a recognizer from positive and negative example words.
//!
//! The positive words are stored in a trie, which is flattened into an edge
//! graph that yields an automaton accepting exactly the positive words. This
//! automaton is then generalized by adding transitions, in the order of the
//! edge potencies, as long as no negative word becomes accepted.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod edge_graph;
mod inductor;
mod potency;
mod train;
mod trie;

pub use edge_graph::*;
pub use inductor::*;
pub use potency::*;
pub use train::*;
pub use trie::*;

/// A word as a sequence of input symbols.
pub type Word = Vec<String>;
