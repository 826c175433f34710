//! Interaction network file formats.
//!
//! - [`EdgeList`]: whitespace-delimited `a b` pairs, one undirected edge per line
//! - [`combine`]: merge headered interaction tables into one edge list
//! - [`write_dot`]: Graphviz export for viewing a network

pub mod combine;
mod dot;
mod edgelist;

pub use combine::{combine_networks, write_pairs, CombineColumns};
pub use dot::write_dot;
pub use edgelist::{load, EdgeList};
