//! Sparse-dense products on candle tensors.
//!
//! Candle has no sparse storage, so a [`SparseTensor`] keeps the coordinate
//! lists as index tensors and multiplies by gathering rows of the dense
//! operand (`index_select`) and scattering the weighted rows back
//! (`index_add`). Both ops are differentiable, so gradients reach the dense
//! operand without ever materializing an `N x N` matrix.

use crate::Result;
use candle_core::{DType, Device, Tensor};
use gae_core::SparseMatrix;

/// Coordinate-format sparse matrix living on a device.
#[derive(Debug, Clone)]
pub struct SparseTensor {
    rows: Tensor,
    cols: Tensor,
    values: Tensor,
    shape: (usize, usize),
}

impl SparseTensor {
    /// Upload a [`SparseMatrix`].
    pub fn from_sparse(matrix: &SparseMatrix, device: &Device) -> Result<Self> {
        let nnz = matrix.nnz();
        let rows: Vec<u32> = matrix.rows().iter().map(|&r| r as u32).collect();
        let cols: Vec<u32> = matrix.cols().iter().map(|&c| c as u32).collect();

        Ok(Self {
            rows: Tensor::from_vec(rows, nnz, device)?,
            cols: Tensor::from_vec(cols, nnz, device)?,
            values: Tensor::from_vec(matrix.values().to_vec(), nnz, device)?,
            shape: matrix.shape(),
        })
    }

    /// Same pattern with new values (one per stored entry).
    pub fn with_values(&self, values: Tensor) -> Self {
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
            shape: self.shape,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn nnz(&self) -> usize {
        self.values.elem_count()
    }

    pub fn values(&self) -> &Tensor {
        &self.values
    }

    /// `self · dense` for a dense `[cols, d]` operand, giving `[rows, d]`.
    pub fn matmul(&self, dense: &Tensor) -> Result<Tensor> {
        let (k, d) = dense.dims2()?;
        if k != self.shape.1 {
            return Err(crate::Error::DimensionMismatch {
                expected: self.shape.1,
                got: k,
            });
        }

        let out = Tensor::zeros((self.shape.0, d), DType::F32, dense.device())?;
        if self.nnz() == 0 {
            return Ok(out);
        }

        let gathered = dense.index_select(&self.cols, 0)?;
        let weighted = gathered.broadcast_mul(&self.values.unsqueeze(1)?)?;
        Ok(out.index_add(&self.rows, &weighted, 0)?)
    }

    /// Dense copy, mainly for inspection in tests.
    pub fn to_dense(&self) -> Result<Tensor> {
        let n = self.shape.1;
        let eye: Vec<f32> = (0..n * n)
            .map(|k| if k / n == k % n { 1.0 } else { 0.0 })
            .collect();
        self.matmul(&Tensor::from_vec(eye, (n, n), self.values.device())?)
    }
}
