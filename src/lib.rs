//! `gae` links the graph preparation crate and the model crate.
//!
//! - [`core`] (`gae-core`): edge lists, edge splits, adjacency normalization
//! - [`nn`] (`gae-nn`): GCN encoder, inner-product decoder, training, metrics
//!
//! ```rust,ignore
//! use gae::nn::{TrainConfig, Trainer};
//! use gae::nn::candle_core::Device;
//!
//! let graph = gae::core::load("combined_network.txt")?;
//! let mut trainer = Trainer::from_graph(&graph, TrainConfig::default(), &Device::Cpu)?;
//! trainer.fit(|epoch| println!("{epoch}"))?;
//! ```

pub use gae_core as core;
pub use gae_nn as nn;

pub use gae_core::{load, split_edges, Graph, SplitConfig};
pub use gae_nn::{TrainConfig, Trainer};
