//! Class-imbalance-corrected reconstruction loss.
//!
//! A sparse graph has far more non-edges than edges, so positives are
//! up-weighted by `pos_weight = (N² - E) / E` and the mean is rescaled by
//! `norm = N² / (2 (N² - E))`, where `E` counts the set entries of the
//! label matrix `A_train + I`.
//!
//! The per-entry term is the logits form of weighted binary cross-entropy,
//! stable for large `|x|`:
//!
//! ```text
//! (1 - z)·x + (1 + (q - 1)·z) · (log(1 + e^{-|x|}) + max(-x, 0))
//! ```

use crate::{Error, Result};
use candle_core::Tensor;
use gae_core::SparseMatrix;

/// Loss weights derived from the training label matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossWeights {
    pub pos_weight: f64,
    pub norm: f64,
}

impl LossWeights {
    /// Weights for an `N x N` label matrix with `E` set entries.
    pub fn new(num_nodes: usize, num_set: f64) -> Result<Self> {
        let total = (num_nodes * num_nodes) as f64;
        let negatives = total - num_set;
        if num_set <= 0.0 || negatives <= 0.0 {
            return Err(Error::NumericalInstability(format!(
                "label matrix has {num_set} of {total} entries set"
            )));
        }
        Ok(Self {
            pos_weight: negatives / num_set,
            norm: total / (2.0 * negatives),
        })
    }

    /// Weights for a label matrix such as `A_train + I`.
    pub fn from_labels(labels: &SparseMatrix) -> Result<Self> {
        let (n, _) = labels.shape();
        let set: f64 = labels.values().iter().map(|&v| f64::from(v)).sum();
        Self::new(n, set)
    }
}

/// `norm · mean(weighted_cross_entropy(logits, labels, pos_weight))`.
pub fn weighted_link_loss(
    logits: &Tensor,
    labels: &Tensor,
    weights: LossWeights,
) -> Result<Tensor> {
    if logits.dims() != labels.dims() {
        return Err(Error::DimensionMismatch {
            expected: labels.elem_count(),
            got: logits.elem_count(),
        });
    }

    let log_weight = labels.affine(weights.pos_weight - 1.0, 1.0)?;
    let softplus = logits.abs()?.neg()?.exp()?.affine(1.0, 1.0)?.log()?;
    let stable = softplus.add(&logits.neg()?.relu()?)?;
    let negative_term = labels.affine(-1.0, 1.0)?.mul(logits)?;
    let per_entry = negative_term.add(&log_weight.mul(&stable)?)?;

    Ok(per_entry.mean_all()?.affine(weights.norm, 0.0)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;
    use gae_core::{label_matrix, Graph};

    fn reference(x: f64, z: f64, q: f64) -> f64 {
        let p = 1.0 / (1.0 + (-x).exp());
        -(q * z * p.ln() + (1.0 - z) * (1.0 - p).ln())
    }

    #[test]
    fn test_weights_from_labels() {
        let g = Graph::from_edges(4, &[(0, 1), (1, 2)]).unwrap();
        let w = LossWeights::from_labels(&label_matrix(&g).unwrap()).unwrap();

        // E = 4 self-loops + 4 directed edge entries = 8, N² = 16
        assert!((w.pos_weight - 1.0).abs() < 1e-12);
        assert!((w.norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_reject_full_matrix() {
        assert!(LossWeights::new(2, 4.0).is_err());
        assert!(LossWeights::new(2, 0.0).is_err());
    }

    #[test]
    fn test_matches_naive_cross_entropy() {
        let xs = [-3.0f32, -0.5, 0.0, 0.7, 4.0];
        let zs = [1.0f32, 0.0, 1.0, 0.0, 1.0];
        let weights = LossWeights { pos_weight: 2.5, norm: 0.8 };

        let logits = Tensor::new(&xs, &Device::Cpu).unwrap();
        let labels = Tensor::new(&zs, &Device::Cpu).unwrap();
        let loss = weighted_link_loss(&logits, &labels, weights)
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();

        let expected: f64 = xs
            .iter()
            .zip(&zs)
            .map(|(&x, &z)| reference(f64::from(x), f64::from(z), 2.5))
            .sum::<f64>()
            / xs.len() as f64
            * 0.8;
        assert!((f64::from(loss) - expected).abs() < 1e-5, "{loss} vs {expected}");
    }

    #[test]
    fn test_extreme_logits_finite() {
        let logits = Tensor::new(&[-80f32, 80., -80., 80.], &Device::Cpu).unwrap();
        let labels = Tensor::new(&[1f32, 0., 0., 1.], &Device::Cpu).unwrap();
        let loss = weighted_link_loss(&logits, &labels, LossWeights { pos_weight: 3.0, norm: 1.0 })
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();

        assert!(loss.is_finite());
        assert!(loss > 0.0);
    }

    #[test]
    fn test_shape_mismatch() {
        let logits = Tensor::new(&[0f32, 1.], &Device::Cpu).unwrap();
        let labels = Tensor::new(&[0f32], &Device::Cpu).unwrap();
        let w = LossWeights { pos_weight: 1.0, norm: 1.0 };
        assert!(weighted_link_loss(&logits, &labels, w).is_err());
    }
}
