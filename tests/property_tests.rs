use creditline_engine::core::house::HouseId;
use creditline_engine::core::line::CreditLine;
use creditline_engine::graph::credit_graph::{CreditGraph, GraphConfig};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};

const HOUSES: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

fn all_houses() -> Vec<HouseId> {
    HOUSES.iter().map(|h| HouseId::new(h)).collect()
}

/// Generate a random line between two distinct houses of a small pool.
fn arb_line() -> impl Strategy<Value = CreditLine> {
    (0..HOUSES.len(), 0..HOUSES.len(), 0i64..200).prop_filter_map(
        "source must differ from destination",
        |(from, to, capacity)| {
            if from == to {
                None
            } else {
                Some(CreditLine::new(
                    HouseId::new(HOUSES[from]),
                    HouseId::new(HOUSES[to]),
                    "swap",
                    "spot",
                    capacity,
                ))
            }
        },
    )
}

/// Generate a random subset of the pool as switchers.
fn arb_switchers() -> impl Strategy<Value = BTreeSet<HouseId>> {
    prop::collection::vec(any::<bool>(), HOUSES.len()).prop_map(|flags| {
        flags
            .into_iter()
            .zip(HOUSES)
            .filter(|(on, _)| *on)
            .map(|(_, h)| HouseId::new(h))
            .collect()
    })
}

/// A credit network: lines, switchers and a source house.
fn arb_network() -> impl Strategy<Value = (Vec<CreditLine>, BTreeSet<HouseId>, HouseId)> {
    (
        prop::collection::vec(arb_line(), 0..25),
        arb_switchers(),
        prop::sample::select(HOUSES.to_vec()).prop_map(HouseId::new),
    )
}

fn build(lines: &[CreditLine], switchers: &BTreeSet<HouseId>, source: &HouseId) -> CreditGraph {
    CreditGraph::build(
        source.clone(),
        all_houses(),
        lines,
        switchers.iter().cloned(),
        GraphConfig::default(),
    )
    .unwrap()
}

/// Plain Bellman-Ford over the graph's edges.
fn reference_values(graph: &CreditGraph) -> HashMap<HouseId, i64> {
    let mut best: HashMap<HouseId, i64> = HashMap::new();
    best.insert(graph.source().clone(), 0);
    for _ in 0..graph.node_count() {
        for node in graph.nodes() {
            let Some(&base) = best.get(node.house()) else {
                continue;
            };
            for (next, edge) in graph.neighbors(node.house()) {
                let candidate = base + edge.weight;
                if best.get(next).map_or(true, |&v| candidate < v) {
                    best.insert(next.clone(), candidate);
                }
            }
        }
    }
    best
}

proptest! {
    // ===================================================================
    // INVARIANT 1: The source scores zero with an empty path.
    // ===================================================================
    #[test]
    fn source_is_zero((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        let node = graph.node(&source).unwrap();
        prop_assert_eq!(node.credit_value(), Some(0));
        prop_assert!(node.shortest_path().is_empty());
    }

    // ===================================================================
    // INVARIANT 2: Relaxation consistency.
    //
    // Every reached house scores exactly its predecessor's value plus the
    // weight of the last hop, and its path is the predecessor's path plus
    // the predecessor itself.
    // ===================================================================
    #[test]
    fn relaxation_is_consistent((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        for node in graph.nodes() {
            if node.house() == &source {
                continue;
            }
            let Some(value) = node.credit_value() else {
                prop_assert!(node.shortest_path().is_empty());
                continue;
            };
            let path = node.shortest_path();
            prop_assert_eq!(path.first(), Some(&source));

            let last = path.last().unwrap();
            let pred = graph.node(last).unwrap();
            let edge = graph.edge(last, node.house()).unwrap();
            prop_assert_eq!(pred.credit_value(), Some(value - edge.weight));

            let mut expected = pred.shortest_path().to_vec();
            expected.push(last.clone());
            prop_assert_eq!(path, expected.as_slice());
        }
    }

    // ===================================================================
    // INVARIANT 3: Paths are simple and never contain their own house.
    // ===================================================================
    #[test]
    fn paths_are_simple((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        for node in graph.nodes() {
            let path = node.shortest_path();
            let distinct: HashSet<&HouseId> = path.iter().collect();
            prop_assert_eq!(distinct.len(), path.len());
            prop_assert!(!path.contains(node.house()));
        }
    }

    // ===================================================================
    // INVARIANT 4: Values match an independent Bellman-Ford.
    // ===================================================================
    #[test]
    fn values_match_reference((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        let reference = reference_values(&graph);
        for node in graph.nodes() {
            prop_assert_eq!(node.credit_value(), reference.get(node.house()).copied());
        }
    }

    // ===================================================================
    // INVARIANT 5: Switch edges follow the switch rule exactly.
    //
    // An edge is a switch edge iff lines exist in both directions and at
    // least one end is a switcher.
    // ===================================================================
    #[test]
    fn switch_edges_follow_rule((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        let pairs: HashSet<(HouseId, HouseId)> = lines
            .iter()
            .map(|l| (l.source().clone(), l.destination().clone()))
            .collect();

        for a in all_houses() {
            for b in all_houses() {
                if a == b {
                    continue;
                }
                let expected = (switchers.contains(&a) || switchers.contains(&b))
                    && pairs.contains(&(a.clone(), b.clone()))
                    && pairs.contains(&(b.clone(), a.clone()));
                prop_assert_eq!(graph.has_switch_edge(&a, &b), expected);
            }
        }
    }

    // ===================================================================
    // INVARIANT 6: Alternates are bounded, sorted descending, distinct,
    // and include the chosen route.
    // ===================================================================
    #[test]
    fn alternates_bounded_and_sorted((lines, switchers, source) in arb_network()) {
        let graph = build(&lines, &switchers, &source);
        for node in graph.nodes() {
            let alternates = node.alternate_paths().as_slice();
            prop_assert!(alternates.len() <= 5);
            for pair in alternates.windows(2) {
                prop_assert!(pair[0].credit_value >= pair[1].credit_value);
            }
            let distinct: HashSet<&Vec<HouseId>> = alternates.iter().map(|a| &a.path).collect();
            prop_assert_eq!(distinct.len(), alternates.len());

            if node.house() != &source && node.is_reachable() {
                prop_assert!(alternates.iter().any(|a| a.path == node.shortest_path()));
            }
        }
    }

    // ===================================================================
    // INVARIANT 7: Routing is deterministic and re-runnable.
    // ===================================================================
    #[test]
    fn routing_is_repeatable((lines, switchers, source) in arb_network()) {
        let first = build(&lines, &switchers, &source);
        let mut second = build(&lines, &switchers, &source);
        second.calculate_routes().unwrap();
        for node in first.nodes() {
            let other = second.node(node.house()).unwrap();
            prop_assert_eq!(node.credit_value(), other.credit_value());
        }
    }
}
