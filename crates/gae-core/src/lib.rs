#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

//! Graph preparation for link prediction.
//!
//! This crate holds everything that happens before a tensor exists:
//!
//! - [`Graph`] - an undirected interaction network with stable node indices
//! - [`formats`] - edge-list reading/writing and merging of interaction tables
//! - [`split`] - train/validation/test edge splits with negative sampling
//! - [`normalize`] - the symmetric GCN propagation matrix `D^-1/2 (A+I) D^-1/2`
//! - [`SparseMatrix`] - coordinate-format matrices shared by the above
//!
//! # Pipeline
//!
//! ```text
//! edge list ──load──▶ Graph ──split_edges──▶ EdgeSplit
//!                                               │
//!                      train_graph ──normalize_graph──▶ Â (SparseMatrix)
//! ```
//!
//! # Example
//!
//! ```rust
//! use gae_core::{normalize_graph, split_edges, Graph, SplitConfig};
//!
//! let edges: Vec<(usize, usize)> = (0..100).map(|i| (i, (i + 1) % 100)).collect();
//! let graph = Graph::from_edges(100, &edges)?;
//!
//! let split = split_edges(&graph, &SplitConfig::default())?;
//! assert_eq!(split.test_pos.len(), 2);
//!
//! let adj_norm = normalize_graph(&split.train_graph)?;
//! assert!(adj_norm.is_symmetric(1e-6));
//! # Ok::<(), gae_core::Error>(())
//! ```

mod error;
pub mod formats;
mod graph;
pub mod normalize;
mod sparse;
pub mod split;

pub use error::{Error, Result};
pub use formats::{load, EdgeList};
pub use graph::{canonical, Edge, Graph, GraphStats};
pub use normalize::{label_matrix, normalize, normalize_graph};
pub use sparse::SparseMatrix;
pub use split::{split_edges, EdgeSplit, SplitConfig};

pub use petgraph;
