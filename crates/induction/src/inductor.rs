use std::panic::resume_unwind;
use std::thread;
use std::time::Instant;

use log::debug;
use log::info;
use log::trace;
use thiserror::Error;

use dawg_automata::Automaton;
use dawg_automata::AutomatonBuilder;
use dawg_automata::AutomatonError;
use dawg_automata::DeterminismViolation;
use dawg_automata::StateIndex;

use crate::EdgeGraph;
use crate::NodeId;
use crate::RankedEdge;
use crate::Word;
use crate::ACCEPT_SINK;
use crate::START;

#[derive(Error, Debug)]
pub enum InductionError {
    #[error("Node {0} of the edge graph is not a state of the automaton")]
    UnknownNode(NodeId),

    #[error(transparent)]
    Automaton(#[from] AutomatonError),

    #[error(transparent)]
    Determinism(#[from] DeterminismViolation),
}

/// Options for the generalization of the exact automaton.
#[derive(Clone, Debug)]
pub struct InductionConfig {
    /// The number of threads that check the negative words of one candidate transition.
    pub threads: usize,
}

impl Default for InductionConfig {
    fn default() -> Self {
        InductionConfig { threads: 1 }
    }
}

/// Counts of the candidate transitions considered during induction.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InductionReport {
    pub candidates: usize,
    pub kept: usize,
    pub rolled_back: usize,
}

/// Returns the automaton that accepts exactly the words described by the edge graph.
///
/// Node `n` becomes state `"n"`, with `"0"` the initial state and `"1"` the
/// only final state. The alphabet consists of the symbols on the edges.
pub fn exact_automaton(graph: &EdgeGraph) -> Result<Automaton, AutomatonError> {
    let mut builder = AutomatonBuilder::new()
        .state(START.to_string())
        .state(ACCEPT_SINK.to_string())
        .alphabet(graph.alphabet())
        .initial_state(START.to_string())
        .final_state(ACCEPT_SINK.to_string());

    for edge in graph.edges() {
        builder = builder.state(edge.origin.to_string());
        for symbol in &edge.labels {
            builder = builder.add_transition(
                edge.origin.to_string(),
                symbol.clone(),
                edge.destination.to_string(),
            );
        }
    }

    builder.build()
}

/// Generalizes the automaton by adding transitions along the ranked edges.
///
/// For every edge, in the given order, and every symbol that is not already
/// a label of that edge, a transition from the origin to the destination is
/// added. The addition is kept when no negative word is accepted afterwards
/// and rolled back otherwise. Decisions are never revisited.
pub fn induce(
    automaton: &mut Automaton,
    graph: &EdgeGraph,
    ranked: &[RankedEdge],
    negative: &[Word],
    config: &InductionConfig,
) -> Result<InductionReport, InductionError> {
    let start = Instant::now();
    let mut report = InductionReport::default();
    let mut last_progress = 0.0;

    for (k, ranked_edge) in ranked.iter().enumerate() {
        let edge = &graph.edges()[ranked_edge.edge];
        let origin = node_state(automaton, edge.origin)?;
        let destination = node_state(automaton, edge.destination)?;

        for symbol in 0..automaton.num_of_symbols() {
            if edge.labels.contains(automaton.symbol_label(symbol)) {
                continue;
            }

            let undo = automaton.add_transition(origin, symbol, destination)?;
            if undo.is_noop(automaton) {
                continue;
            }
            report.candidates += 1;

            if accepts_any(automaton, negative, config.threads) {
                trace!(
                    "Rolled back {} x {} -> {}",
                    edge.origin,
                    automaton.symbol_label(symbol),
                    edge.destination
                );
                automaton.undo(undo);
                report.rolled_back += 1;
            } else {
                report.kept += 1;
            }
        }

        let progress = (k + 1) as f64 / ranked.len() as f64 * 100.0;
        if progress - last_progress > 5.0 {
            info!("Progress: {progress:.2}%");
            last_progress = progress;
        }
    }

    debug!("Induction report {report:?}");
    debug!("Time induce: {:.3}s", start.elapsed().as_secs_f64());
    Ok(report)
}

/// Returns the state of the automaton that corresponds to the given node.
fn node_state(automaton: &Automaton, node: NodeId) -> Result<StateIndex, InductionError> {
    automaton
        .state_index(&node.to_string())
        .ok_or(InductionError::UnknownNode(node))
}

/// Returns true iff any of the words is accepted, checking disjoint chunks of
/// the words on separate threads when more than one thread is requested.
fn accepts_any(automaton: &Automaton, words: &[Word], threads: usize) -> bool {
    if threads <= 1 || words.len() < 2 {
        return words.iter().any(|word| automaton.accepts(word));
    }

    let chunk_size = words.len().div_ceil(threads);
    thread::scope(|s| {
        let handles: Vec<_> = words
            .chunks(chunk_size)
            .map(|chunk| s.spawn(move || chunk.iter().any(|word| automaton.accepts(word))))
            .collect();

        // Join every worker before deciding, so the decision covers all words.
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| resume_unwind(payload)))
            .fold(false, |accepted, result| accepted || result)
    })
}
