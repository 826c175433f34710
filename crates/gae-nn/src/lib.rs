//! Graph autoencoder for link prediction.
//!
//! `gae-nn` turns a prepared graph (see `gae-core`) into node embeddings
//! and scores unseen edges. It sits on `candle` for tensors, autodiff and
//! the Adam optimizer.
//!
//! # Modules
//!
//! - [`conv`]: sparse-input and dense graph convolutions, the two-layer encoder
//! - [`decoder`]: inner-product decoder `σ(Z Zᵀ)`
//! - [`loss`]: class-imbalance-weighted reconstruction loss
//! - [`evaluation`]: ROC-AUC and average precision over held-out pairs
//! - [`training`]: the full-batch training loop and output artifacts
//!
//! # Model
//!
//! ```text
//! H = ReLU(Â · dropout_sparse(I) · W₁)      [N, hidden1]
//! Z = Â · dropout(H) · W₂                   [N, hidden2]
//! P = σ(Z · Zᵀ)                             [N, N]
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use candle_core::Device;
//! use gae_nn::{TrainConfig, Trainer};
//!
//! let graph = gae_core::load("combined_network.txt")?;
//! let config = TrainConfig::default().with_epochs(200);
//! let mut trainer = Trainer::from_graph(&graph, config, &Device::Cpu)?;
//!
//! trainer.fit(|epoch| println!("{epoch}"))?;
//! println!("test {}", trainer.test_metrics()?.summary());
//! ```

pub mod config;
pub mod conv;
pub mod decoder;
pub mod dropout;
pub mod error;
pub mod evaluation;
pub mod loss;
pub mod sparse;
pub mod training;

pub use config::TrainConfig;
pub use conv::GcnEncoder;
pub use decoder::InnerProductDecoder;
pub use error::{Error, Result};
pub use evaluation::{score, LinkMetrics};
pub use loss::{weighted_link_loss, LossWeights};
pub use training::{EpochReport, StopReason, Trainer, TrainingOutcome};

pub use candle_core;
