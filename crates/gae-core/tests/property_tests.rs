//! Property-based tests for graph preparation.
//!
//! These tests verify invariants that should hold for any input graph:
//! - Normalized adjacency is symmetric with entries in [0, 1]
//! - Held-out splits have the documented sizes
//! - Sampled negatives never coincide with a positive edge

use gae_core::{normalize_graph, split_edges, Edge, Error, Graph, SplitConfig};
use proptest::prelude::*;
use std::collections::HashSet;

/// Arbitrary simple graph: node count plus an edge list over it.
fn arb_graph(max_nodes: usize) -> impl Strategy<Value = Graph> {
    (2..max_nodes).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..(n * 3)).prop_map(move |pairs| {
            let edges: Vec<Edge> = pairs.into_iter().filter(|(i, j)| i != j).collect();
            Graph::from_edges(n, &edges).unwrap()
        })
    })
}

mod normalize_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn normalized_is_symmetric_and_bounded(graph in arb_graph(40)) {
            let norm = normalize_graph(&graph).unwrap();

            prop_assert!(norm.is_symmetric(1e-6));
            for (_, _, v) in norm.iter() {
                prop_assert!((0.0..=1.0 + 1e-6).contains(&v), "entry {} out of range", v);
            }
        }

        #[test]
        fn isolated_rows_are_unit_diagonal(graph in arb_graph(30)) {
            let norm = normalize_graph(&graph).unwrap();

            for (node, degree) in graph.degrees().into_iter().enumerate() {
                if degree == 0 {
                    let row: Vec<_> = norm.iter().filter(|&(r, _, _)| r == node).collect();
                    prop_assert_eq!(row, vec![(node, node, 1.0)]);
                }
            }
        }

        #[test]
        fn diagonal_always_present(graph in arb_graph(30)) {
            let norm = normalize_graph(&graph).unwrap();
            for i in 0..graph.node_count() {
                prop_assert!(norm.get(i, i) > 0.0);
            }
        }
    }
}

mod split_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn split_sizes_and_disjointness(graph in arb_graph(60), seed in 0u64..1000) {
            let config = SplitConfig::default().with_seed(seed);
            let e = graph.edge_count();

            match split_edges(&graph, &config) {
                Ok(split) => {
                    prop_assert_eq!(split.val_pos.len(), e / 50);
                    prop_assert_eq!(split.val_neg.len(), e / 50);
                    prop_assert_eq!(split.test_pos.len(), e / 50);
                    prop_assert_eq!(split.test_neg.len(), e / 50);

                    let positives: HashSet<Edge> = split
                        .train_edges
                        .iter()
                        .chain(&split.val_pos)
                        .chain(&split.test_pos)
                        .copied()
                        .collect();
                    prop_assert_eq!(positives.len(), e);

                    for &(i, j) in split.val_neg.iter().chain(&split.test_neg) {
                        prop_assert!(i != j);
                        prop_assert!(!positives.contains(&(i, j)));
                        prop_assert!(!positives.contains(&(j, i)));
                    }
                }
                Err(Error::InsufficientEdges { edges, .. }) => {
                    prop_assert!(e < 50);
                    prop_assert_eq!(edges, e);
                }
                Err(Error::NegativeSampling { .. }) => {
                    // Only near-complete graphs run out of non-edges.
                    let n = graph.node_count();
                    prop_assert!(n * (n - 1) / 2 - e < 2 * (e / 50) + 1);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }
    }
}
