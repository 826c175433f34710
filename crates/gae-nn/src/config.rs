//! Training hyperparameters.

use crate::{Error, Result};
use gae_core::SplitConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Training configuration.
///
/// Loadable from TOML; every field has a default so partial files work.
///
/// ```toml
/// learning_rate = 0.01
/// epochs = 200
/// hidden1 = 32
/// hidden2 = 16
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Adam learning rate (default: 0.01).
    pub learning_rate: f64,
    /// Maximum number of epochs (default: 100).
    pub epochs: usize,
    /// Units in the first convolution layer (default: 32).
    pub hidden1: usize,
    /// Embedding dimension, units in the second layer (default: 16).
    pub hidden2: usize,
    /// Encoder dropout rate in [0, 1) (default: 0.1).
    pub dropout: f32,
    /// Dropout applied to embeddings before the inner product (default: 0.0).
    pub decoder_dropout: f32,
    /// Fraction of edges held out for validation (default: 0.02).
    pub val_fraction: f64,
    /// Fraction of edges held out for testing (default: 0.02).
    pub test_fraction: f64,
    /// Seed for splitting, initialization and dropout (default: 123).
    pub seed: u64,
    /// Stop once the epoch's training loss is at or below this (default: 0.001).
    pub loss_threshold: f32,
    /// Negative-sampling draws allowed per needed pair (default: 1000).
    pub max_attempts_factor: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.01,
            epochs: 100,
            hidden1: 32,
            hidden2: 16,
            dropout: 0.1,
            decoder_dropout: 0.0,
            val_fraction: 0.02,
            test_fraction: 0.02,
            seed: 123,
            loss_threshold: 0.001,
            max_attempts_factor: 1000,
        }
    }
}

impl TrainConfig {
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_hidden(mut self, hidden1: usize, hidden2: usize) -> Self {
        self.hidden1 = hidden1;
        self.hidden2 = hidden2;
        self
    }

    pub fn with_dropout(mut self, dropout: f32) -> Self {
        self.dropout = dropout;
        self
    }

    pub fn with_fractions(mut self, val: f64, test: f64) -> Self {
        self.val_fraction = val;
        self.test_fraction = test;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_loss_threshold(mut self, threshold: f32) -> Self {
        self.loss_threshold = threshold;
        self
    }

    /// Edge split settings derived from this configuration.
    pub fn split_config(&self) -> SplitConfig {
        SplitConfig {
            val_fraction: self.val_fraction,
            test_fraction: self.test_fraction,
            seed: self.seed,
            max_attempts_factor: self.max_attempts_factor,
        }
    }

    /// Reject values the model cannot train with.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.hidden1 == 0 || self.hidden2 == 0 {
            return Err(Error::InvalidConfig(
                "hidden layer sizes must be positive".to_string(),
            ));
        }
        for (name, rate) in [("dropout", self.dropout), ("decoder_dropout", self.decoder_dropout)] {
            if !(0.0..1.0).contains(&rate) {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be in [0, 1), got {rate}"
                )));
            }
        }
        self.split_config().validate()?;
        Ok(())
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
