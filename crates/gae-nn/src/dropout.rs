//! Seeded inverted dropout.
//!
//! Masks are drawn on the host from a [`XorShiftRng`] and uploaded, so a
//! run is reproducible from its seed. Kept entries are scaled by
//! `1 / (1 - rate)`.

use crate::sparse::SparseTensor;
use crate::Result;
use candle_core::Tensor;
use rand::prelude::*;
use rand_xorshift::XorShiftRng;

/// Dropout mask generator used in training mode.
#[derive(Debug, Clone)]
pub struct Dropout {
    rng: XorShiftRng,
}

impl Dropout {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: XorShiftRng::seed_from_u64(seed),
        }
    }

    /// Inverted-dropout mask of `len` entries: `0` or `1 / (1 - rate)`.
    pub fn mask(&mut self, len: usize, rate: f32) -> Vec<f32> {
        let scale = 1.0 / (1.0 - rate);
        (0..len)
            .map(|_| {
                if self.rng.gen::<f32>() < rate {
                    0.0
                } else {
                    scale
                }
            })
            .collect()
    }

    /// Dropout over every entry of a dense tensor.
    pub fn dense(&mut self, xs: &Tensor, rate: f32) -> Result<Tensor> {
        if rate <= 0.0 {
            return Ok(xs.clone());
        }
        let mask = self.mask(xs.elem_count(), rate);
        let mask = Tensor::from_vec(mask, xs.dims(), xs.device())?;
        Ok(xs.mul(&mask)?)
    }

    /// Dropout over the stored entries of a sparse tensor only.
    pub fn sparse(&mut self, xs: &SparseTensor, rate: f32) -> Result<SparseTensor> {
        if rate <= 0.0 {
            return Ok(xs.clone());
        }
        let mask = self.mask(xs.nnz(), rate);
        let mask = Tensor::from_vec(mask, xs.nnz(), xs.values().device())?;
        Ok(xs.with_values(xs.values().mul(&mask)?))
    }
}
