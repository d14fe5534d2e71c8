//!
//! A crate containing IO related functionality. This includes parsing the
//! textual transition specifications, storing automata and reading the word
//! lists used for training and testing.
//!

mod error;
mod line_iterator;

pub mod dataset;
pub mod definition;
pub mod persistence;

pub use error::*;
pub use line_iterator::*;
