//! Graph convolution layers and the two-layer encoder.
//!
//! Each layer computes
//!
//! ```text
//! H' = act(Â · dropout(H) · W)
//! ```
//!
//! where Â is the fixed normalized adjacency. The first layer takes a
//! sparse input (the identity features of a featureless graph) and drops
//! only stored entries; the second is dense and linear, producing the
//! node embeddings.
//!
//! # Reference
//!
//! Kipf & Welling, "Variational Graph Auto-Encoders", NIPS Workshop 2016.

use crate::dropout::Dropout;
use crate::sparse::SparseTensor;
use crate::{Error, Result};
use candle_core::{Device, Tensor, Var};
use rand::Rng;
use std::collections::HashMap;
use std::path::Path;

/// Glorot/Xavier uniform initialization in `±sqrt(6 / (fan_in + fan_out))`.
pub fn glorot_uniform<R: Rng + ?Sized>(
    fan_in: usize,
    fan_out: usize,
    rng: &mut R,
    device: &Device,
) -> Result<Var> {
    let bound = (6.0 / (fan_in + fan_out) as f64).sqrt() as f32;
    let data: Vec<f32> = (0..fan_in * fan_out)
        .map(|_| rng.gen_range(-bound..bound))
        .collect();
    let init = Tensor::from_vec(data, (fan_in, fan_out), device)?;
    Ok(Var::from_tensor(&init)?)
}

/// Layer nonlinearity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Relu,
    Identity,
}

impl Activation {
    fn apply(self, xs: Tensor) -> Result<Tensor> {
        match self {
            Self::Relu => Ok(xs.relu()?),
            Self::Identity => Ok(xs),
        }
    }
}

/// Convolution over a sparse input matrix.
pub struct SparseGraphConv {
    weight: Var,
    activation: Activation,
}

impl SparseGraphConv {
    pub fn new(weight: Var, activation: Activation) -> Self {
        Self { weight, activation }
    }

    /// Forward pass. `dropout` is `Some` in training mode.
    pub fn forward(
        &self,
        x: &SparseTensor,
        adj: &SparseTensor,
        rate: f32,
        dropout: Option<&mut Dropout>,
    ) -> Result<Tensor> {
        let x = match dropout {
            Some(d) => d.sparse(x, rate)?,
            None => x.clone(),
        };
        let xw = x.matmul(self.weight.as_tensor())?;
        self.activation.apply(adj.matmul(&xw)?)
    }

    pub fn weight(&self) -> &Var {
        &self.weight
    }
}

/// Convolution over a dense input matrix.
pub struct GraphConv {
    weight: Var,
    activation: Activation,
}

impl GraphConv {
    pub fn new(weight: Var, activation: Activation) -> Self {
        Self { weight, activation }
    }

    /// Forward pass. `dropout` is `Some` in training mode.
    pub fn forward(
        &self,
        x: &Tensor,
        adj: &SparseTensor,
        rate: f32,
        dropout: Option<&mut Dropout>,
    ) -> Result<Tensor> {
        let x = match dropout {
            Some(d) => d.dense(x, rate)?,
            None => x.clone(),
        };
        let xw = x.matmul(self.weight.as_tensor())?;
        self.activation.apply(adj.matmul(&xw)?)
    }

    pub fn weight(&self) -> &Var {
        &self.weight
    }
}

/// Two-layer GCN encoder: sparse ReLU layer, then dense linear layer.
///
/// Owns the only learned parameters of the model. The optimizer receives
/// clones of the [`Var`]s (which share storage) and is the only writer.
pub struct GcnEncoder {
    layer1: SparseGraphConv,
    layer2: GraphConv,
    dropout: f32,
}

impl GcnEncoder {
    /// Create an encoder with Glorot-initialized weights.
    ///
    /// # Arguments
    /// - `input_dim`: feature dimension (node count for featureless graphs)
    /// - `hidden1`: first layer width
    /// - `hidden2`: embedding dimension
    /// - `dropout`: training-mode dropout rate
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        hidden1: usize,
        hidden2: usize,
        dropout: f32,
        rng: &mut R,
        device: &Device,
    ) -> Result<Self> {
        let w1 = glorot_uniform(input_dim, hidden1, rng, device)?;
        let w2 = glorot_uniform(hidden1, hidden2, rng, device)?;
        Self::from_weights(w1, w2, dropout)
    }

    /// Build from existing weights, checking that the shapes chain.
    pub fn from_weights(w1: Var, w2: Var, dropout: f32) -> Result<Self> {
        let (_, h1) = w1.as_tensor().dims2()?;
        let (h1_in, _) = w2.as_tensor().dims2()?;
        if h1 != h1_in {
            return Err(Error::DimensionMismatch {
                expected: h1,
                got: h1_in,
            });
        }
        Ok(Self {
            layer1: SparseGraphConv::new(w1, Activation::Relu),
            layer2: GraphConv::new(w2, Activation::Identity),
            dropout,
        })
    }

    /// Node embeddings `[N, hidden2]`.
    ///
    /// Pass `Some(dropout)` for training mode, `None` for evaluation.
    pub fn forward(
        &self,
        features: &SparseTensor,
        adj: &SparseTensor,
        mut dropout: Option<&mut Dropout>,
    ) -> Result<Tensor> {
        let hidden = self
            .layer1
            .forward(features, adj, self.dropout, dropout.as_deref_mut())?;
        self.layer2.forward(&hidden, adj, self.dropout, dropout)
    }

    /// Learned parameters, for the optimizer.
    pub fn vars(&self) -> Vec<Var> {
        vec![self.layer1.weight().clone(), self.layer2.weight().clone()]
    }

    pub fn input_dim(&self) -> usize {
        self.layer1.weight().as_tensor().dims()[0]
    }

    pub fn embedding_dim(&self) -> usize {
        self.layer2.weight().as_tensor().dims()[1]
    }

    /// Save both weight matrices as safetensors.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let tensors: HashMap<String, Tensor> = [
            ("layer1.weight".to_string(), self.layer1.weight().as_tensor().clone()),
            ("layer2.weight".to_string(), self.layer2.weight().as_tensor().clone()),
        ]
        .into_iter()
        .collect();
        candle_core::safetensors::save(&tensors, path)?;
        Ok(())
    }

    /// Load weights written by [`GcnEncoder::save`].
    pub fn load(path: impl AsRef<Path>, dropout: f32, device: &Device) -> Result<Self> {
        let mut tensors = candle_core::safetensors::load(path, device)?;
        let mut take = |name: &str| {
            tensors
                .remove(name)
                .ok_or_else(|| Error::Checkpoint(format!("missing tensor {name}")))
        };
        let w1 = take("layer1.weight")?;
        let w2 = take("layer2.weight")?;
        if w1.rank() != 2 || w2.rank() != 2 {
            return Err(Error::Checkpoint("weights must be matrices".to_string()));
        }
        Self::from_weights(Var::from_tensor(&w1)?, Var::from_tensor(&w2)?, dropout)
            .map_err(|e| Error::Checkpoint(e.to_string()))
    }
}
