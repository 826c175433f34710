use crate::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An undirected edge between two node indices, stored as `(i, j)` with `i < j`.
pub type Edge = (usize, usize);

/// Canonical upper-triangular orientation of a node pair.
#[inline]
pub fn canonical(i: usize, j: usize) -> Edge {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}

/// An undirected, unweighted interaction graph.
///
/// Uses petgraph's undirected graph internally. Node indices are dense
/// (`0..node_count`) and follow first appearance of each label. Self-loops
/// and parallel edges are never stored, so the implied adjacency matrix is
/// symmetric with a zero diagonal.
///
/// # Example
///
/// ```rust
/// use gae_core::Graph;
///
/// let mut g = Graph::new();
/// g.add_edge("P53", "MDM2");
/// g.add_edge("MDM2", "P53"); // same undirected edge
/// g.add_edge("P53", "BRCA1");
///
/// assert_eq!(g.node_count(), 3);
/// assert_eq!(g.edge_count(), 2);
/// assert_eq!(g.degree(0), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// The underlying undirected graph. Node weights are the labels.
    graph: UnGraph<String, ()>,

    /// Map from label to node index.
    node_index: HashMap<String, NodeIndex>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph with estimated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            node_index: HashMap::with_capacity(nodes),
        }
    }

    /// Build a graph over nodes labelled `"0".."num_nodes-1"` from index pairs.
    ///
    /// Fails if an index is out of range. Self-loops and duplicates are ignored.
    pub fn from_edges(num_nodes: usize, edges: &[Edge]) -> Result<Self> {
        let labels = (0..num_nodes).map(|i| i.to_string()).collect();
        Self::from_labels(labels).with_edges(edges)
    }

    /// Build an edgeless graph with the given node labels, in order.
    pub fn from_labels(labels: Vec<String>) -> Self {
        let mut g = Self::with_capacity(labels.len(), 0);
        for label in labels {
            g.get_or_create_node(&label);
        }
        g
    }

    /// A graph over the same nodes as `self` containing only `edges`.
    pub fn with_edges(&self, edges: &[Edge]) -> Result<Self> {
        let mut g = Self::with_capacity(self.node_count(), edges.len());
        for idx in self.graph.node_indices() {
            g.get_or_create_node(&self.graph[idx]);
        }
        for &(i, j) in edges {
            g.add_index_edge(i, j)?;
        }
        Ok(g)
    }

    /// Get or create a node by label, returning its dense index.
    pub fn get_or_create_node(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.node_index.get(label) {
            return idx.index();
        }
        let idx = self.graph.add_node(label.to_string());
        self.node_index.insert(label.to_string(), idx);
        idx.index()
    }

    /// Add an undirected edge between two labels, creating nodes as needed.
    ///
    /// Returns `false` when the edge is a self-loop or already present.
    pub fn add_edge(&mut self, a: &str, b: &str) -> bool {
        let i = self.get_or_create_node(a);
        let j = self.get_or_create_node(b);
        self.insert(i, j)
    }

    /// Add an undirected edge between two existing node indices.
    pub fn add_index_edge(&mut self, i: usize, j: usize) -> Result<bool> {
        let n = self.node_count();
        if i >= n || j >= n {
            return Err(Error::InvalidConfig(format!(
                "edge ({i}, {j}) out of range for {n} nodes"
            )));
        }
        Ok(self.insert(i, j))
    }

    fn insert(&mut self, i: usize, j: usize) -> bool {
        if i == j || self.has_edge(i, j) {
            return false;
        }
        self.graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
        true
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `i` and `j` are adjacent (in either orientation).
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        let n = self.node_count();
        if i >= n || j >= n {
            return false;
        }
        self.graph
            .find_edge(NodeIndex::new(i), NodeIndex::new(j))
            .is_some()
    }

    /// Degree of node `i` (0 for unknown indices).
    pub fn degree(&self, i: usize) -> usize {
        if i >= self.node_count() {
            return 0;
        }
        self.graph.neighbors(NodeIndex::new(i)).count()
    }

    /// Degrees of all nodes, indexed by node.
    pub fn degrees(&self) -> Vec<usize> {
        let mut degrees = vec![0; self.node_count()];
        for e in self.graph.edge_references() {
            degrees[e.source().index()] += 1;
            degrees[e.target().index()] += 1;
        }
        degrees
    }

    /// Neighbor indices of node `i`, ascending.
    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        if i >= self.node_count() {
            return Vec::new();
        }
        let mut out: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(i))
            .map(NodeIndex::index)
            .collect();
        out.sort_unstable();
        out
    }

    /// All edges in upper-triangular orientation, sorted.
    pub fn edges(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .graph
            .edge_references()
            .map(|e| canonical(e.source().index(), e.target().index()))
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Label of node `i`.
    pub fn label(&self, i: usize) -> Option<&str> {
        self.graph.node_weight(NodeIndex::new(i)).map(String::as_str)
    }

    /// Index of the node with the given label.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.node_index.get(label).map(|idx| idx.index())
    }

    /// Node labels in index order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Get the underlying petgraph for advanced operations.
    pub fn as_petgraph(&self) -> &UnGraph<String, ()> {
        &self.graph
    }
}

/// Statistics about an interaction graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of undirected edges.
    pub edge_count: usize,
    /// Smallest degree (0 for an empty graph).
    pub min_degree: usize,
    /// Largest degree.
    pub max_degree: usize,
    /// Mean degree, `2E / N`.
    pub mean_degree: f64,
    /// Nodes without any edge.
    pub isolated_nodes: usize,
}

impl Graph {
    /// Compute statistics about the graph.
    pub fn stats(&self) -> GraphStats {
        let degrees = self.degrees();
        let node_count = degrees.len();
        let edge_count = self.edge_count();

        let mean_degree = if node_count > 0 {
            2.0 * edge_count as f64 / node_count as f64
        } else {
            0.0
        };

        GraphStats {
            node_count,
            edge_count,
            min_degree: degrees.iter().copied().min().unwrap_or(0),
            max_degree: degrees.iter().copied().max().unwrap_or(0),
            mean_degree,
            isolated_nodes: degrees.iter().filter(|&&d| d == 0).count(),
        }
    }
}
