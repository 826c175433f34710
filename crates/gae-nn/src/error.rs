//! Error types for gae-nn.

use thiserror::Error;

/// gae-nn error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Candle tensor error.
    #[error("tensor error: {0}")]
    Tensor(#[from] candle_core::Error),

    /// Graph preparation error.
    #[error(transparent)]
    Core(#[from] gae_core::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Dimension mismatch.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Invalid configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Loss weights or activations left the finite range.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// Metric undefined for the given labels.
    #[error("metric error: {0}")]
    Metric(String),

    /// Checkpoint could not be read or does not fit the model.
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
