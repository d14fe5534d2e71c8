use std::time::Instant;

use log::debug;
use log::trace;

use crate::EdgeGraph;
use crate::NodeId;
use crate::ACCEPT_SINK;

/// An edge of the [EdgeGraph] together with its potency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedEdge {
    /// The index of the edge in [EdgeGraph::edges].
    pub edge: usize,
    pub origin: NodeId,
    pub destination: NodeId,
    /// The number of simple paths from the destination to the accept sink.
    pub potency: usize,
}

/// Returns the number of simple paths from source to target.
///
/// A path never visits a node twice, so walking around a cycle does not add paths. When
/// source equals target there is exactly one (empty) path.
pub fn count_paths(successors: &[Vec<NodeId>], source: NodeId, target: NodeId) -> usize {
    if source == target {
        return 1;
    }

    let mut count = 0;
    let mut on_path = vec![false; successors.len()];

    // Every entry is a node on the current path and the next successor to try.
    let mut stack: Vec<(NodeId, usize)> = vec![(source, 0)];
    on_path[source] = true;

    while let Some((node, cursor)) = stack.last_mut() {
        match successors[*node].get(*cursor) {
            Some(&next) => {
                *cursor += 1;
                if next == target {
                    count += 1;
                } else if !on_path[next] {
                    on_path[next] = true;
                    stack.push((next, 0));
                }
            }
            None => {
                on_path[*node] = false;
                stack.pop();
            }
        }
    }

    count
}

/// Orders the edges of the graph by decreasing potency.
///
/// The potency of an edge is the number of simple paths from its destination
/// to [ACCEPT_SINK]. Edges with equal potency stay in discovery order.
pub fn rank_edges(graph: &EdgeGraph) -> Vec<RankedEdge> {
    let start = Instant::now();

    let mut successors: Vec<Vec<NodeId>> = vec![Vec::new(); graph.num_of_nodes()];
    for edge in graph.edges() {
        successors[edge.origin].push(edge.destination);
    }

    // Many edges share a destination, so the counts are computed once per node.
    let mut potencies: Vec<Option<usize>> = vec![None; graph.num_of_nodes()];

    let mut ranked: Vec<RankedEdge> = graph
        .edges()
        .iter()
        .enumerate()
        .map(|(index, edge)| {
            let potency = *potencies[edge.destination]
                .get_or_insert_with(|| count_paths(&successors, edge.destination, ACCEPT_SINK));
            trace!("Edge {} -> {} has potency {potency}", edge.origin, edge.destination);

            RankedEdge {
                edge: index,
                origin: edge.origin,
                destination: edge.destination,
                potency,
            }
        })
        .collect();

    ranked.sort_by(|left, right| right.potency.cmp(&left.potency));

    debug!("Time rank_edges: {:.3}s", start.elapsed().as_secs_f64());
    ranked
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use dawg_automata::split_symbols;

    use crate::extract_edges;
    use crate::WordTrie;
    use crate::START;

    use super::*;

    fn graph(words: &[&str]) -> EdgeGraph {
        extract_edges(&WordTrie::from_words(words.iter().map(|word| split_symbols(word))))
    }

    #[test]
    fn test_potency_into_sink() {
        let graph = graph(&["ab", "ac"]);
        let ranked = rank_edges(&graph);

        // The a edge leads to the branch node, which has one path into the sink.
        assert_eq!(ranked.len(), 2);
        assert!(ranked.iter().all(|edge| edge.potency == 1));

        let into_sink = ranked.iter().find(|edge| edge.destination == ACCEPT_SINK).unwrap();
        assert_eq!(graph.edges()[into_sink.edge].labels.len(), 2);
    }

    #[test]
    fn test_sorted_by_decreasing_potency() {
        let graph = graph(&["abc", "abd", "abe", "ax", "b"]);
        let ranked = rank_edges(&graph);

        assert!(ranked.windows(2).all(|pair| pair[0].potency >= pair[1].potency));

        // Node 2 reaches the sink directly and through node 3.
        let from_start = ranked.iter().find(|edge| edge.origin == START && edge.destination != ACCEPT_SINK).unwrap();
        assert_eq!(from_start.potency, 2);
        assert_eq!(ranked[0].origin, START);
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let graph = graph(&["ab", "cd", "ef"]);
        let ranked = rank_edges(&graph);

        let order: Vec<usize> = ranked.iter().map(|edge| edge.edge).collect();
        assert_eq!(order, (0..graph.edges().len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_potency_is_sum_of_successors() {
        let graph = graph(&["aab", "aac", "ab", "b", "bab", "bba"]);
        let ranked = rank_edges(&graph);

        let potency_of = |node: NodeId| -> usize {
            if node == ACCEPT_SINK {
                1
            } else {
                graph
                    .edges()
                    .iter()
                    .filter(|edge| edge.origin == node)
                    .map(|edge| {
                        ranked
                            .iter()
                            .find(|other| other.origin == edge.origin && other.destination == edge.destination)
                            .unwrap()
                            .potency
                    })
                    .sum::<usize>()
            }
        };

        for edge in &ranked {
            assert_eq!(edge.potency, potency_of(edge.destination));
        }
    }

    #[test]
    fn test_count_paths_in_cycle() {
        // 2 -> 3 -> 2 is a cycle, both reach the sink.
        let mut graph = EdgeGraph::new();
        graph.add_edge(START, 2, "a");
        graph.add_edge(2, 3, "b");
        graph.add_edge(3, 2, "c");
        graph.add_edge(2, ACCEPT_SINK, "d");
        graph.add_edge(3, ACCEPT_SINK, "e");

        let mut successors = vec![Vec::new(); graph.num_of_nodes()];
        for edge in graph.edges() {
            successors[edge.origin].push(edge.destination);
        }

        assert_eq!(count_paths(&successors, 2, ACCEPT_SINK), 2);
        assert_eq!(count_paths(&successors, 3, ACCEPT_SINK), 2);
        assert_eq!(count_paths(&successors, START, ACCEPT_SINK), 2);
        assert_eq!(count_paths(&successors, ACCEPT_SINK, ACCEPT_SINK), 1);
        assert_eq!(count_paths(&successors, ACCEPT_SINK, START), 0);
    }
}
