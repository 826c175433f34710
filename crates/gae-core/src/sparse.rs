//! Coordinate-format sparse matrices.
//!
//! Entries are kept sorted by `(row, col)` with duplicates summed, so two
//! matrices with the same nonzeros compare equal regardless of build order.

use crate::{Error, Graph, Result};

/// A sparse `f32` matrix in coordinate (index, value, shape) form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    rows: Vec<usize>,
    cols: Vec<usize>,
    values: Vec<f32>,
    shape: (usize, usize),
}

impl SparseMatrix {
    /// Build from `(row, col, value)` triplets. Duplicate coordinates are summed.
    pub fn from_triplets(
        shape: (usize, usize),
        mut entries: Vec<(usize, usize, f32)>,
    ) -> Result<Self> {
        for &(r, c, _) in &entries {
            if r >= shape.0 || c >= shape.1 {
                return Err(Error::InvalidConfig(format!(
                    "entry ({r}, {c}) out of bounds for shape {shape:?}"
                )));
            }
        }

        entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut rows = Vec::with_capacity(entries.len());
        let mut cols = Vec::with_capacity(entries.len());
        let mut values: Vec<f32> = Vec::with_capacity(entries.len());
        for (r, c, v) in entries {
            if rows.last() == Some(&r) && cols.last() == Some(&c) {
                if let Some(last) = values.last_mut() {
                    *last += v;
                }
                continue;
            }
            rows.push(r);
            cols.push(c);
            values.push(v);
        }

        Ok(Self {
            rows,
            cols,
            values,
            shape,
        })
    }

    /// The `n x n` identity matrix (the featureless input encoding).
    pub fn identity(n: usize) -> Self {
        Self {
            rows: (0..n).collect(),
            cols: (0..n).collect(),
            values: vec![1.0; n],
            shape: (n, n),
        }
    }

    /// Symmetric 0/1 adjacency of a graph, both orientations stored.
    pub fn adjacency(graph: &Graph) -> Result<Self> {
        let n = graph.node_count();
        let mut entries = Vec::with_capacity(graph.edge_count() * 2);
        for (i, j) in graph.edges() {
            entries.push((i, j, 1.0));
            entries.push((j, i, 1.0));
        }
        Self::from_triplets((n, n), entries)
    }

    /// An all-zero matrix.
    pub fn zeros(shape: (usize, usize)) -> Self {
        Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
            shape,
        }
    }

    /// `self + I`. Requires a square matrix.
    pub fn add_identity(&self) -> Result<Self> {
        let (n, m) = self.shape;
        if n != m {
            return Err(Error::InvalidConfig(format!(
                "cannot add identity to a {n}x{m} matrix"
            )));
        }
        let mut entries: Vec<(usize, usize, f32)> = self.iter().collect();
        entries.extend((0..n).map(|i| (i, i, 1.0)));
        Self::from_triplets(self.shape, entries)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Iterate `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
    }

    /// Value at `(row, col)`, zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        let start = self.rows.partition_point(|&r| r < row);
        let end = self.rows.partition_point(|&r| r <= row);
        self.cols[start..end]
            .binary_search(&col)
            .map(|k| self.values[start + k])
            .unwrap_or(0.0)
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f32> {
        let mut sums = vec![0.0; self.shape.0];
        for (r, _, v) in self.iter() {
            sums[r] += v;
        }
        sums
    }

    /// Whether `A == A^T` up to `tol`.
    pub fn is_symmetric(&self, tol: f32) -> bool {
        self.shape.0 == self.shape.1
            && self
                .iter()
                .all(|(r, c, v)| (self.get(c, r) - v).abs() <= tol)
    }

    /// Dense row-major copy, flattened to `rows * cols` values.
    pub fn to_dense(&self) -> Vec<f32> {
        let mut dense = vec![0.0; self.shape.0 * self.shape.1];
        for (r, c, v) in self.iter() {
            dense[r * self.shape.1 + c] = v;
        }
        dense
    }

    /// Same sparsity pattern with values replaced by `f(row, col, value)`.
    pub fn map_values(&self, mut f: impl FnMut(usize, usize, f32) -> f32) -> Self {
        let values = self.iter().map(|(r, c, v)| f(r, c, v)).collect();
        Self {
            rows: self.rows.clone(),
            cols: self.cols.clone(),
            values,
            shape: self.shape,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triplets_sorted_and_summed() {
        let m = SparseMatrix::from_triplets(
            (2, 2),
            vec![(1, 0, 2.0), (0, 1, 1.0), (1, 0, 0.5)],
        )
        .unwrap();

        assert_eq!(m.nnz(), 2);
        assert_eq!(m.rows(), &[0, 1]);
        assert_eq!(m.get(1, 0), 2.5);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_out_of_bounds() {
        assert!(SparseMatrix::from_triplets((2, 2), vec![(2, 0, 1.0)]).is_err());
    }

    #[test]
    fn test_adjacency_symmetric() {
        let g = Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
        let a = SparseMatrix::adjacency(&g).unwrap();

        assert_eq!(a.nnz(), 4);
        assert!(a.is_symmetric(0.0));
        assert_eq!(a.row_sums(), vec![1.0, 2.0, 1.0]);
        assert_eq!(a.get(1, 1), 0.0);
    }

    #[test]
    fn test_adjacency_keeps_isolated_nodes() {
        let g = Graph::from_edges(4, &[(0, 1)]).unwrap();
        let a = SparseMatrix::adjacency(&g).unwrap();

        assert_eq!(a.shape(), (4, 4));
        assert_eq!(a.nnz(), 2);
        assert_eq!(a.row_sums(), vec![1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_add_identity() {
        let g = Graph::from_edges(2, &[(0, 1)]).unwrap();
        let a = SparseMatrix::adjacency(&g).unwrap().add_identity().unwrap();

        assert_eq!(a.to_dense(), vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_add_identity_rejects_rectangular() {
        assert!(SparseMatrix::zeros((2, 3)).add_identity().is_err());
    }

    #[test]
    fn test_identity_dense() {
        assert_eq!(
            SparseMatrix::identity(2).to_dense(),
            vec![1.0, 0.0, 0.0, 1.0]
        );
    }
}
