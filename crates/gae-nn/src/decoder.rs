//! Inner-product decoder: `σ(Z · Zᵀ)`.

use crate::dropout::Dropout;
use crate::Result;
use candle_core::Tensor;

/// Reconstructs pairwise edge scores from node embeddings.
#[derive(Debug, Clone, Copy, Default)]
pub struct InnerProductDecoder {
    dropout: f32,
}

impl InnerProductDecoder {
    pub fn new(dropout: f32) -> Self {
        Self { dropout }
    }

    /// Flattened `N*N` logits `Z · Zᵀ`, no activation.
    ///
    /// Used for the training loss, which applies the sigmoid internally.
    pub fn logits(&self, z: &Tensor, dropout: Option<&mut Dropout>) -> Result<Tensor> {
        let z = match dropout {
            Some(d) => d.dense(z, self.dropout)?,
            None => z.clone(),
        };
        Ok(z.matmul(&z.t()?)?.flatten_all()?)
    }

    /// Flattened `N*N` edge probabilities `σ(Z · Zᵀ)`.
    pub fn decode(&self, z: &Tensor, dropout: Option<&mut Dropout>) -> Result<Tensor> {
        Ok(candle_nn::ops::sigmoid(&self.logits(z, dropout)?)?)
    }
}

/// Logistic sigmoid on the host.
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}
