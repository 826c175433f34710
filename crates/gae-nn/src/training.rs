//! Full-batch training loop.
//!
//! Each epoch:
//! 1. Forward pass in training mode (dropout on)
//! 2. Weighted reconstruction loss against `A_train + I`
//! 3. One Adam step on both weight matrices
//! 4. Validation ROC-AUC / AP with dropout off
//!
//! Training stops after `epochs` epochs, or earlier once an epoch's own
//! training loss is at or below `loss_threshold`.
//!
//! # Example
//!
//! ```rust,ignore
//! use gae_nn::{TrainConfig, Trainer};
//!
//! let graph = gae_core::load("combined_network.txt")?;
//! let mut trainer = Trainer::from_graph(&graph, TrainConfig::default(), &Device::Cpu)?;
//! let outcome = trainer.fit(|report| println!("{report}"))?;
//! let test = trainer.test_metrics()?;
//! ```

use crate::conv::GcnEncoder;
use crate::decoder::InnerProductDecoder;
use crate::dropout::Dropout;
use crate::evaluation::{self, LinkMetrics};
use crate::loss::{weighted_link_loss, LossWeights};
use crate::sparse::SparseTensor;
use crate::{Error, Result, TrainConfig};
use candle_core::{Device, Tensor};
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use gae_core::{label_matrix, normalize_graph, split_edges, Edge, EdgeSplit, Graph, SparseMatrix};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use std::fmt;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics of one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    /// 1-based epoch index.
    pub epoch: usize,
    pub train_loss: f32,
    pub val: LinkMetrics,
    pub elapsed: Duration,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Epoch: {:04} train_loss= {:.5} val_roc= {:.5} val_ap= {:.5} time= {:.5}",
            self.epoch,
            self.train_loss,
            self.val.roc_auc,
            self.val.average_precision,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Why training ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The training loss reached the threshold.
    LossThreshold,
    /// All epochs ran without reaching the threshold (convergence warning).
    EpochBudget,
}

/// Result of [`Trainer::fit`].
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub history: Vec<EpochReport>,
    pub stop_reason: StopReason,
}

impl TrainingOutcome {
    pub fn final_loss(&self) -> Option<f32> {
        self.history.last().map(|r| r.train_loss)
    }

    pub fn converged(&self) -> bool {
        self.stop_reason == StopReason::LossThreshold
    }
}

/// Graph autoencoder trainer.
///
/// Holds the fixed inputs (features, propagation matrix, labels), the
/// encoder parameters and the optimizer state. Nothing here is global.
pub struct Trainer {
    config: TrainConfig,
    split: EdgeSplit,
    features: SparseTensor,
    adj_norm: SparseTensor,
    labels: Tensor,
    weights: LossWeights,
    encoder: GcnEncoder,
    decoder: InnerProductDecoder,
    optimizer: AdamW,
    dropout: Dropout,
}

impl Trainer {
    /// Split `graph` with the configured fractions and seed, then build a trainer.
    pub fn from_graph(graph: &Graph, config: TrainConfig, device: &Device) -> Result<Self> {
        config.validate()?;
        let split = split_edges(graph, &config.split_config())?;
        Self::new(split, config, device)
    }

    /// Build a trainer for an existing split.
    pub fn new(split: EdgeSplit, config: TrainConfig, device: &Device) -> Result<Self> {
        config.validate()?;
        let n = split.train_graph.node_count();

        let features = SparseTensor::from_sparse(&SparseMatrix::identity(n), device)?;
        let adj_norm = SparseTensor::from_sparse(&normalize_graph(&split.train_graph)?, device)?;

        let label_sparse = label_matrix(&split.train_graph)?;
        let weights = LossWeights::from_labels(&label_sparse)?;
        let labels = Tensor::from_vec(label_sparse.to_dense(), n * n, device)?;

        // Split uses `seed`, dropout `seed + 1`, init `seed + 2`.
        let mut init_rng = XorShiftRng::seed_from_u64(config.seed.wrapping_add(2));
        let encoder = GcnEncoder::new(
            n,
            config.hidden1,
            config.hidden2,
            config.dropout,
            &mut init_rng,
            device,
        )?;
        let decoder = InnerProductDecoder::new(config.decoder_dropout);

        let optimizer = AdamW::new(
            encoder.vars(),
            ParamsAdamW {
                lr: config.learning_rate,
                weight_decay: 0.0,
                ..Default::default()
            },
        )?;

        info!(
            nodes = n,
            train_edges = split.train_edges.len(),
            pos_weight = weights.pos_weight,
            norm = weights.norm,
            "initialized graph autoencoder"
        );

        Ok(Self {
            dropout: Dropout::new(config.seed.wrapping_add(1)),
            config,
            split,
            features,
            adj_norm,
            labels,
            weights,
            encoder,
            decoder,
            optimizer,
        })
    }

    /// Run one optimizer step; returns the loss computed before the step.
    pub fn train_step(&mut self) -> Result<f32> {
        let z = self
            .encoder
            .forward(&self.features, &self.adj_norm, Some(&mut self.dropout))?;
        let logits = self.decoder.logits(&z, Some(&mut self.dropout))?;
        let loss = weighted_link_loss(&logits, &self.labels, self.weights)?;

        self.optimizer.backward_step(&loss)?;

        let value = loss.to_scalar::<f32>()?;
        if !value.is_finite() {
            return Err(Error::NumericalInstability(format!(
                "training loss became {value}"
            )));
        }
        Ok(value)
    }

    /// Node embeddings in evaluation mode (no dropout).
    pub fn embeddings(&self) -> Result<Tensor> {
        self.encoder.forward(&self.features, &self.adj_norm, None)
    }

    /// ROC-AUC / AP for a positive and a negative pair list.
    pub fn evaluate(&self, pos: &[Edge], neg: &[Edge]) -> Result<LinkMetrics> {
        evaluation::score(pos, neg, &self.embeddings()?)
    }

    pub fn validation_metrics(&self) -> Result<LinkMetrics> {
        self.evaluate(&self.split.val_pos, &self.split.val_neg)
    }

    pub fn test_metrics(&self) -> Result<LinkMetrics> {
        self.evaluate(&self.split.test_pos, &self.split.test_neg)
    }

    /// Train until the loss threshold or the epoch budget, reporting every epoch.
    pub fn fit<F: FnMut(&EpochReport)>(&mut self, mut on_epoch: F) -> Result<TrainingOutcome> {
        let mut history = Vec::with_capacity(self.config.epochs);
        let mut stop_reason = StopReason::EpochBudget;

        for epoch in 1..=self.config.epochs {
            let start = Instant::now();
            let train_loss = self.train_step()?;
            let val = self.validation_metrics()?;

            let report = EpochReport {
                epoch,
                train_loss,
                val,
                elapsed: start.elapsed(),
            };
            debug!(
                epoch,
                train_loss,
                val_roc = val.roc_auc,
                val_ap = val.average_precision,
                "epoch finished"
            );
            on_epoch(&report);
            history.push(report);

            if train_loss <= self.config.loss_threshold {
                stop_reason = StopReason::LossThreshold;
                info!(epoch, train_loss, "training loss reached threshold");
                break;
            }
        }

        if stop_reason == StopReason::EpochBudget {
            warn!(
                epochs = self.config.epochs,
                threshold = self.config.loss_threshold,
                "epoch budget exhausted before the loss threshold was reached"
            );
        }

        Ok(TrainingOutcome {
            history,
            stop_reason,
        })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn split(&self) -> &EdgeSplit {
        &self.split
    }

    pub fn encoder(&self) -> &GcnEncoder {
        &self.encoder
    }

    pub fn loss_weights(&self) -> LossWeights {
        self.weights
    }

    /// Scores of the test positives followed by the test negatives.
    pub fn test_predictions(&self) -> Result<Vec<(Edge, bool, f64)>> {
        let z = self.embeddings()?;
        let pos = evaluation::edge_scores(&z, &self.split.test_pos)?;
        let neg = evaluation::edge_scores(&z, &self.split.test_neg)?;

        Ok(self
            .split
            .test_pos
            .iter()
            .zip(pos)
            .map(|(&e, s)| (e, true, s))
            .chain(self.split.test_neg.iter().zip(neg).map(|(&e, s)| (e, false, s)))
            .collect())
    }
}

/// Write one `{:.4}` score per line.
pub fn write_predictions<W: Write>(predictions: &[(Edge, bool, f64)], mut writer: W) -> Result<()> {
    for (_, _, score) in predictions {
        writeln!(writer, "{score:.4}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `i<TAB>j<TAB>label` rows in prediction order.
pub fn write_edges<W: Write>(predictions: &[(Edge, bool, f64)], mut writer: W) -> Result<()> {
    for ((i, j), label, _) in predictions {
        writeln!(writer, "{i}\t{j}\t{}", u8::from(*label))?;
    }
    writer.flush()?;
    Ok(())
}
