use crate::core::house::HouseId;
use crate::graph::credit_graph::CreditEdge;
use crate::graph::node::Node;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::VecDeque;
use thiserror::Error;

/// Errors arising from a routing run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error("source house '{0}' not found in the credit network")]
    SourceNotFound(HouseId),
    #[error("routing exceeded the limit of {limit} relaxations")]
    RelaxationLimitExceeded { limit: usize },
}

/// Compute the best credit route from `source` to every reachable house.
///
/// Houses are processed in FIFO order rather than by tentative value. A
/// house whose value strictly improves is queued again unless it is already
/// waiting, so when the queue drains every reached house satisfies
/// `value(v) == value(u) + weight(u -> v)` for its last hop `u`.
///
/// Edge weights are non-negative, so improvements are finite and no route
/// ever passes through the house it leads to.
///
/// Returns the number of improving relaxations performed. With `limit` set,
/// fails once that many relaxations have been exceeded.
pub fn relax_from(
    graph: &mut DiGraph<Node, CreditEdge>,
    source: NodeIndex,
    limit: Option<usize>,
) -> Result<usize, RoutingError> {
    for node in graph.node_weights_mut() {
        node.reset();
    }
    graph[source].initialize_as_source();

    let mut queue = VecDeque::from([source]);
    let mut queued = vec![false; graph.node_count()];
    queued[source.index()] = true;
    let mut relaxations = 0usize;

    while let Some(current) = queue.pop_front() {
        queued[current.index()] = false;

        let Some(base) = graph[current].credit_value() else {
            continue;
        };
        let mut via = graph[current].shortest_path().to_vec();
        via.push(graph[current].house().clone());

        let edges: Vec<(NodeIndex, i64)> = graph
            .edges(current)
            .map(|e| (e.target(), e.weight().weight))
            .collect();

        for (next, weight) in edges {
            if !graph[next].offer(base.saturating_add(weight), &via) {
                continue;
            }
            relaxations += 1;
            if let Some(limit) = limit {
                if relaxations > limit {
                    return Err(RoutingError::RelaxationLimitExceeded { limit });
                }
            }
            if !queued[next.index()] {
                queued[next.index()] = true;
                graph[next].mark_visited();
                queue.push_back(next);
            }
        }
    }

    debug!(
        "Routing from {} settled after {} relaxations",
        graph[source].house(),
        relaxations
    );
    Ok(relaxations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::credit_graph::EdgeKind;
    use crate::graph::node::DEFAULT_MAX_ALTERNATES;

    fn direct(weight: i64) -> CreditEdge {
        CreditEdge {
            kind: EdgeKind::Direct,
            weight,
        }
    }

    fn build(houses: &[&str], edges: &[(usize, usize, i64)]) -> (DiGraph<Node, CreditEdge>, Vec<NodeIndex>) {
        let mut graph = DiGraph::new();
        let idx: Vec<NodeIndex> = houses
            .iter()
            .map(|h| graph.add_node(Node::new(HouseId::new(h), DEFAULT_MAX_ALTERNATES)))
            .collect();
        for &(from, to, weight) in edges {
            graph.add_edge(idx[from], idx[to], direct(weight));
        }
        (graph, idx)
    }

    #[test]
    fn test_requeues_improved_house() {
        // FIFO reaches C via B first, then D offers a cheaper route to B.
        let (mut graph, idx) = build(
            &["A", "B", "C", "D"],
            &[(0, 1, 10), (0, 3, 1), (1, 2, 1), (3, 1, 2)],
        );
        relax_from(&mut graph, idx[0], None).unwrap();

        assert_eq!(graph[idx[1]].credit_value(), Some(3));
        assert_eq!(graph[idx[2]].credit_value(), Some(4));
        let path: Vec<&str> = graph[idx[2]]
            .shortest_path()
            .iter()
            .map(|h| h.as_str())
            .collect();
        assert_eq!(path, vec!["A", "D", "B"]);
    }

    #[test]
    fn test_zero_weight_cycle_terminates() {
        let (mut graph, idx) = build(&["A", "B", "C"], &[(0, 1, 0), (1, 2, 0), (2, 1, 0), (2, 0, 0)]);
        relax_from(&mut graph, idx[0], None).unwrap();
        assert_eq!(graph[idx[0]].credit_value(), Some(0));
        assert_eq!(graph[idx[2]].credit_value(), Some(0));
        assert!(graph[idx[0]].shortest_path().is_empty());
    }

    #[test]
    fn test_relaxation_limit() {
        let (mut graph, idx) = build(&["A", "B", "C"], &[(0, 1, 5), (1, 2, 5)]);
        let result = relax_from(&mut graph, idx[0], Some(1));
        assert_eq!(result, Err(RoutingError::RelaxationLimitExceeded { limit: 1 }));
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let (mut graph, idx) = build(&["A", "B"], &[(0, 1, 7)]);
        let first = relax_from(&mut graph, idx[0], None).unwrap();
        let second = relax_from(&mut graph, idx[0], None).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph[idx[1]].credit_value(), Some(7));
        assert_eq!(graph[idx[1]].alternate_paths().len(), 1);
    }
}
