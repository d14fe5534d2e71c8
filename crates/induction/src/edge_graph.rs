use std::collections::BTreeSet;

use log::debug;
use rustc_hash::FxHashMap;

use crate::TrieIndex;
use crate::WordTrie;

/// The identifier of a node in the edge graph.
pub type NodeId = usize;

/// The node corresponding to the root of the trie.
pub const START: NodeId = 0;

/// The node that every word boundary leads to.
pub const ACCEPT_SINK: NodeId = 1;

/// A directed edge with the symbols that lead from its origin to its destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub origin: NodeId,
    pub destination: NodeId,
    pub labels: BTreeSet<String>,
}

/// A labelled directed graph with the distinguished [START] and [ACCEPT_SINK] nodes.
///
/// Edges are kept in the order in which they were first added, and the
/// labels of edges with the same origin and destination are merged.
#[derive(Clone, Debug)]
pub struct EdgeGraph {
    edges: Vec<Edge>,
    indices: FxHashMap<(NodeId, NodeId), usize>,
    num_of_nodes: usize,
}

impl Default for EdgeGraph {
    fn default() -> Self {
        EdgeGraph::new()
    }
}

impl EdgeGraph {
    /// Creates a graph with only the start and accept sink nodes.
    pub fn new() -> EdgeGraph {
        EdgeGraph {
            edges: Vec::new(),
            indices: FxHashMap::default(),
            num_of_nodes: 2,
        }
    }

    /// Adds the symbol to the labels of the edge from origin to destination.
    pub fn add_edge(&mut self, origin: NodeId, destination: NodeId, symbol: impl Into<String>) {
        self.num_of_nodes = self.num_of_nodes.max(origin.max(destination) + 1);

        let index = *self.indices.entry((origin, destination)).or_insert_with(|| {
            self.edges.push(Edge {
                origin,
                destination,
                labels: BTreeSet::new(),
            });
            self.edges.len() - 1
        });

        self.edges[index].labels.insert(symbol.into());
    }

    /// Returns the edges in discovery order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the edge from origin to destination, if it exists.
    pub fn edge(&self, origin: NodeId, destination: NodeId) -> Option<&Edge> {
        self.indices.get(&(origin, destination)).map(|index| &self.edges[*index])
    }

    /// Returns one more than the largest node identifier.
    pub fn num_of_nodes(&self) -> usize {
        self.num_of_nodes
    }

    /// Returns all symbols occurring on the edges.
    pub fn alphabet(&self) -> BTreeSet<String> {
        self.edges
            .iter()
            .flat_map(|edge| edge.labels.iter().cloned())
            .collect()
    }
}

/// Flattens the trie into an edge graph.
///
/// The root becomes [START], a child at which a word ends gets an edge into
/// [ACCEPT_SINK] and every child with children of its own gets a fresh node,
/// numbered from 2 in depth first pre-order.
pub fn extract_edges(trie: &WordTrie) -> EdgeGraph {
    let mut graph = EdgeGraph::new();
    let mut next_id = 2;

    // Every entry is a trie node, its node in the graph and the next child to visit.
    let mut stack: Vec<(TrieIndex, NodeId, usize)> = vec![(trie.root(), START, 0)];

    while let Some((node, node_id, cursor)) = stack.last_mut() {
        let Some((symbol, child)) = trie.children(*node).get(*cursor) else {
            stack.pop();
            continue;
        };
        *cursor += 1;

        let node_id = *node_id;
        if trie.is_word_end(*child) {
            graph.add_edge(node_id, ACCEPT_SINK, symbol.clone());
        }

        if trie.has_children(*child) {
            let child_id = next_id;
            next_id += 1;

            graph.add_edge(node_id, child_id, symbol.clone());
            stack.push((*child, child_id, 0));
        }
    }

    debug!(
        "Extracted {} edges over {} nodes from a trie with {} nodes",
        graph.edges().len(),
        graph.num_of_nodes(),
        trie.num_of_nodes()
    );

    graph
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use dawg_automata::split_symbols;

    use super::*;

    fn trie(words: &[&str]) -> WordTrie {
        WordTrie::from_words(words.iter().map(|word| split_symbols(word)))
    }

    fn labels(edge: &Edge) -> Vec<&str> {
        edge.labels.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_branch_after_common_prefix() {
        let graph = extract_edges(&trie(&["ab", "ac"]));

        assert_eq!(graph.edges().len(), 2);
        assert_eq!(graph.num_of_nodes(), 3);

        let first = graph.edge(START, 2).unwrap();
        assert_eq!(labels(first), vec!["a"]);

        let branch = graph.edge(2, ACCEPT_SINK).unwrap();
        assert_eq!(labels(branch), vec!["b", "c"]);
    }

    #[test]
    fn test_word_end_with_children() {
        // "a" both ends a word and continues into "ab".
        let graph = extract_edges(&trie(&["a", "ab"]));

        assert_eq!(labels(graph.edge(START, ACCEPT_SINK).unwrap()), vec!["a"]);
        assert_eq!(labels(graph.edge(START, 2).unwrap()), vec!["a"]);
        assert_eq!(labels(graph.edge(2, ACCEPT_SINK).unwrap()), vec!["b"]);
        assert_eq!(graph.edges().len(), 3);
    }

    #[test]
    fn test_ids_in_depth_first_pre_order() {
        // The subtree of "a" is numbered before the sibling "b".
        let graph = extract_edges(&trie(&["abc", "ade", "bf"]));

        let origins_and_destinations: Vec<(NodeId, NodeId)> = graph
            .edges()
            .iter()
            .map(|edge| (edge.origin, edge.destination))
            .collect();

        assert_eq!(
            origins_and_destinations,
            vec![(0, 2), (2, 3), (3, 1), (2, 4), (4, 1), (0, 5), (5, 1)]
        );
        assert_eq!(graph.alphabet().len(), 6);
    }

    #[test]
    fn test_empty_trie() {
        let graph = extract_edges(&WordTrie::new());

        assert!(graph.edges().is_empty());
        assert_eq!(graph.num_of_nodes(), 2);
        assert!(graph.alphabet().is_empty());
    }
}
