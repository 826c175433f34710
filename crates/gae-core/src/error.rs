//! Error types for gae-core.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for graph preparation.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed edge-list line.
    #[error("malformed edge list at line {line}: {message}")]
    Format { line: usize, message: String },

    /// Graph too small to carve out a held-out split.
    #[error("{edges} edges are not enough for a {split} fraction of {fraction}")]
    InsufficientEdges {
        edges: usize,
        fraction: f64,
        split: &'static str,
    },

    /// Rejection sampling of non-edges gave up.
    #[error("negative sampling for {split} found {found}/{needed} pairs after {attempts} draws")]
    NegativeSampling {
        split: &'static str,
        found: usize,
        needed: usize,
        attempts: usize,
    },

    /// A normalization denominator was zero or not finite.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Interaction table lacks a required column.
    #[error("{} has no column named {column}", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Result type for graph preparation.
pub type Result<T> = std::result::Result<T, Error>;
