//! Train / validation / test edge splitting with negative sampling.
//!
//! Observed edges are shuffled with a seeded RNG and the first
//! `floor(E * test_fraction)` become test positives, the next
//! `floor(E * val_fraction)` validation positives, the rest training edges.
//! Each held-out split then receives as many sampled non-edges.
//!
//! # Negative sampling rule
//!
//! A sampled pair `(i, j)` is rejected when `i == j`, when it is a positive
//! edge of *any* split (train, validation or test), or when it was already
//! drawn as a negative for *either* split. Both splits use the same rule, so
//! validation and test negatives are disjoint from every positive and from
//! each other.
//!
//! Sampling is rejection-based and bounded: it gives up with
//! [`Error::NegativeSampling`] after `needed * max_attempts_factor` draws,
//! and fails immediately when the graph has fewer non-edges than needed.

use crate::graph::{canonical, Edge};
use crate::{Error, Graph, Result};
use rand::prelude::*;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Edge split configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of edges held out for validation (default: 0.02).
    pub val_fraction: f64,
    /// Fraction of edges held out for testing (default: 0.02).
    pub test_fraction: f64,
    /// Random seed (default: 123).
    pub seed: u64,
    /// Draws allowed per needed negative before giving up (default: 1000).
    pub max_attempts_factor: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            val_fraction: 0.02,
            test_fraction: 0.02,
            seed: 123,
            max_attempts_factor: 1000,
        }
    }
}

impl SplitConfig {
    pub fn with_fractions(mut self, val: f64, test: f64) -> Self {
        self.val_fraction = val;
        self.test_fraction = test;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_attempts_factor(mut self, factor: usize) -> Self {
        self.max_attempts_factor = factor;
        self
    }

    /// Check fractions and sampling bound.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("val_fraction", self.val_fraction),
            ("test_fraction", self.test_fraction),
        ];
        for (name, f) in fractions {
            if !(f > 0.0 && f < 1.0) {
                return Err(Error::InvalidConfig(format!("{name} must be in (0, 1), got {f}")));
            }
        }
        if self.val_fraction + self.test_fraction >= 1.0 {
            return Err(Error::InvalidConfig(
                "val_fraction + test_fraction must leave training edges".to_string(),
            ));
        }
        if self.max_attempts_factor == 0 {
            return Err(Error::InvalidConfig(
                "max_attempts_factor must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of [`split_edges`].
#[derive(Debug, Clone)]
pub struct EdgeSplit {
    /// Graph over all nodes containing only the training edges.
    pub train_graph: Graph,
    /// Training positives, in shuffled order.
    pub train_edges: Vec<Edge>,
    /// Validation positives.
    pub val_pos: Vec<Edge>,
    /// Validation negatives, same length as `val_pos`.
    pub val_neg: Vec<Edge>,
    /// Test positives.
    pub test_pos: Vec<Edge>,
    /// Test negatives, same length as `test_pos`.
    pub test_neg: Vec<Edge>,
}

/// Number of edges a fraction carves out of `edges`.
pub fn held_out_count(edges: usize, fraction: f64) -> usize {
    (edges as f64 * fraction).floor() as usize
}

/// Split a graph's edges into train / validation / test sets.
///
/// # Errors
///
/// - [`Error::InsufficientEdges`] when either held-out split would be empty.
/// - [`Error::NegativeSampling`] when not enough non-edges can be drawn.
pub fn split_edges(graph: &Graph, config: &SplitConfig) -> Result<EdgeSplit> {
    config.validate()?;

    let mut edges: Vec<Edge> = graph.edges().into_iter().filter(|(i, j)| i != j).collect();
    let num_edges = edges.len();

    let num_val = held_out_count(num_edges, config.val_fraction);
    if num_val == 0 {
        return Err(Error::InsufficientEdges {
            edges: num_edges,
            fraction: config.val_fraction,
            split: "validation",
        });
    }
    let num_test = held_out_count(num_edges, config.test_fraction);
    if num_test == 0 {
        return Err(Error::InsufficientEdges {
            edges: num_edges,
            fraction: config.test_fraction,
            split: "test",
        });
    }

    let mut rng = XorShiftRng::seed_from_u64(config.seed);
    edges.shuffle(&mut rng);

    let test_pos = edges[..num_test].to_vec();
    let val_pos = edges[num_test..num_test + num_val].to_vec();
    let train_edges = edges[num_test + num_val..].to_vec();

    let n = graph.node_count();
    let non_edges = n * n.saturating_sub(1) / 2 - num_edges;
    if non_edges < num_val + num_test {
        return Err(Error::NegativeSampling {
            split: "validation+test",
            found: 0,
            needed: num_val + num_test,
            attempts: 0,
        });
    }

    let positives: HashSet<Edge> = edges.iter().copied().collect();
    let mut taken = HashSet::with_capacity(num_val + num_test);

    let mut sampler = NegativeSampler {
        rng: &mut rng,
        num_nodes: n,
        positives: &positives,
        taken: &mut taken,
        max_attempts_factor: config.max_attempts_factor,
    };
    let test_neg = sampler.sample(num_test, "test")?;
    let val_neg = sampler.sample(num_val, "validation")?;

    let train_graph = graph.with_edges(&train_edges)?;

    info!(
        train = train_edges.len(),
        val = val_pos.len(),
        test = test_pos.len(),
        "split edges"
    );

    Ok(EdgeSplit {
        train_graph,
        train_edges,
        val_pos,
        val_neg,
        test_pos,
        test_neg,
    })
}

/// Rejection sampler for node pairs outside the positive set.
struct NegativeSampler<'a> {
    rng: &'a mut XorShiftRng,
    num_nodes: usize,
    positives: &'a HashSet<Edge>,
    taken: &'a mut HashSet<Edge>,
    max_attempts_factor: usize,
}

impl NegativeSampler<'_> {
    fn sample(&mut self, needed: usize, split: &'static str) -> Result<Vec<Edge>> {
        let max_attempts = needed.saturating_mul(self.max_attempts_factor);
        let mut out = Vec::with_capacity(needed);
        let mut attempts = 0usize;

        while out.len() < needed {
            if attempts >= max_attempts {
                return Err(Error::NegativeSampling {
                    split,
                    found: out.len(),
                    needed,
                    attempts,
                });
            }
            attempts += 1;

            let i = self.rng.gen_range(0..self.num_nodes);
            let j = self.rng.gen_range(0..self.num_nodes);
            if i == j {
                continue;
            }
            let pair = canonical(i, j);
            if self.positives.contains(&pair) || !self.taken.insert(pair) {
                continue;
            }
            out.push(pair);
        }

        debug!(split, attempts, found = out.len(), "sampled negatives");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(n: usize) -> Graph {
        let edges: Vec<Edge> = (0..n).map(|i| (i, (i + 1) % n)).collect();
        Graph::from_edges(n, &edges).unwrap()
    }

    #[test]
    fn test_split_sizes() {
        let g = ring(120);
        let split = split_edges(&g, &SplitConfig::default()).unwrap();

        assert_eq!(split.val_pos.len(), 2);
        assert_eq!(split.val_neg.len(), 2);
        assert_eq!(split.test_pos.len(), 2);
        assert_eq!(split.test_neg.len(), 2);
        assert_eq!(split.train_edges.len(), 116);
        assert_eq!(split.train_graph.edge_count(), 116);
        assert_eq!(split.train_graph.node_count(), 120);
    }

    #[test]
    fn test_positive_splits_partition_edges() {
        let g = ring(200);
        let split = split_edges(&g, &SplitConfig::default()).unwrap();

        let mut all: Vec<Edge> = split
            .train_edges
            .iter()
            .chain(&split.val_pos)
            .chain(&split.test_pos)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, g.edges());

        for &(i, j) in split.val_pos.iter().chain(&split.test_pos) {
            assert!(!split.train_graph.has_edge(i, j));
        }
    }

    #[test]
    fn test_negatives_disjoint() {
        let g = ring(100);
        let split = split_edges(&g, &SplitConfig::default().with_fractions(0.1, 0.1)).unwrap();

        let mut seen = HashSet::new();
        for &(i, j) in split.val_neg.iter().chain(&split.test_neg) {
            assert!(i < j);
            assert!(!g.has_edge(i, j));
            assert!(seen.insert((i, j)), "duplicate negative ({i}, {j})");
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let g = ring(150);
        let a = split_edges(&g, &SplitConfig::default()).unwrap();
        let b = split_edges(&g, &SplitConfig::default()).unwrap();
        let c = split_edges(&g, &SplitConfig::default().with_seed(7)).unwrap();

        assert_eq!(a.test_pos, b.test_pos);
        assert_eq!(a.val_neg, b.val_neg);
        assert_ne!(a.train_edges, c.train_edges);
    }

    #[test]
    fn test_empty_graph_insufficient() {
        let err = split_edges(&Graph::new(), &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientEdges { edges: 0, .. }));
    }

    #[test]
    fn test_small_graph_insufficient() {
        let err = split_edges(&ring(49), &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientEdges { edges: 49, .. }));
    }

    #[test]
    fn test_complete_graph_cannot_sample() {
        let n = 12;
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        let g = Graph::from_edges(n, &edges).unwrap();
        let err = split_edges(&g, &SplitConfig::default().with_fractions(0.1, 0.1)).unwrap_err();
        assert!(matches!(err, Error::NegativeSampling { .. }));
    }

    #[test]
    fn test_attempt_bound() {
        // Two non-edges exist but a single draw per needed pair almost never finds them.
        let n = 40;
        let mut edges = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if (i, j) != (0, 1) && (i, j) != (2, 3) {
                    edges.push((i, j));
                }
            }
        }
        let g = Graph::from_edges(n, &edges).unwrap();
        let config = SplitConfig::default()
            .with_fractions(0.0013, 0.0013)
            .with_max_attempts_factor(1);
        match split_edges(&g, &config) {
            Err(Error::NegativeSampling { attempts, .. }) => assert!(attempts <= 1),
            Ok(split) => {
                // The bound permits a lucky draw; it must still be a real non-edge.
                for &(i, j) in split.val_neg.iter().chain(&split.test_neg) {
                    assert!(!g.has_edge(i, j));
                }
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_rejects_bad_fractions() {
        assert!(SplitConfig::default().with_fractions(0.0, 0.1).validate().is_err());
        assert!(SplitConfig::default().with_fractions(0.6, 0.5).validate().is_err());
        assert!(SplitConfig::default().with_max_attempts_factor(0).validate().is_err());
    }
}
