//! Symmetric GCN propagation matrix.
//!
//! ```text
//! Â = D̃^{-1/2} (A + I) D̃^{-1/2},   D̃_ii = Σ_j (A + I)_ij
//! ```
//!
//! Every call adds the identity again, so normalizing a normalized matrix
//! yields a different matrix.

use crate::{Error, Graph, Result, SparseMatrix};

/// Normalize an adjacency matrix into the fixed convolution operator.
pub fn normalize(adj: &SparseMatrix) -> Result<SparseMatrix> {
    let with_loops = adj.add_identity()?;

    let inv_sqrt: Vec<f32> = with_loops
        .row_sums()
        .into_iter()
        .enumerate()
        .map(|(i, d)| {
            if d > 0.0 && d.is_finite() {
                Ok(d.powf(-0.5))
            } else {
                Err(Error::NumericalInstability(format!(
                    "node {i} has degree {d} after adding self-loops"
                )))
            }
        })
        .collect::<Result<_>>()?;

    Ok(with_loops.map_values(|r, c, v| v * inv_sqrt[r] * inv_sqrt[c]))
}

/// Normalized propagation matrix of a graph's adjacency.
pub fn normalize_graph(graph: &Graph) -> Result<SparseMatrix> {
    normalize(&SparseMatrix::adjacency(graph)?)
}

/// Training label matrix `A + I`.
pub fn label_matrix(graph: &Graph) -> Result<SparseMatrix> {
    SparseMatrix::adjacency(graph)?.add_identity()
}
