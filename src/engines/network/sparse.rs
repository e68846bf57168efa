use crate::error::{GeneSimError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, ArrayViewMut2, Zip};

/// Row-compressed sparse matrix of `f64` weights.
///
/// Entries of row `i` live in `indices[indptr[i]..indptr[i + 1]]` with the
/// matching `values`. Duplicate coordinates are kept as separate entries and
/// therefore accumulate in every product.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Builds the matrix from `(row, col, value)` triplets with a counting
    /// sort over rows, O(rows + entries). Entries keep their input order
    /// inside a row.
    pub fn from_triplets(n_rows: usize, n_cols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        for &(row, col, _) in triplets {
            if row >= n_rows || col >= n_cols {
                return Err(GeneSimError::Configuration(format!(
                    "entry ({}, {}) outside a {}x{} matrix",
                    row, col, n_rows, n_cols
                )));
            }
        }
        Ok(Self::assemble(n_rows, n_cols, triplets))
    }

    fn assemble(n_rows: usize, n_cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        let mut indptr = vec![0usize; n_rows + 1];
        for &(row, _, _) in triplets {
            indptr[row + 1] += 1;
        }
        for i in 0..n_rows {
            indptr[i + 1] += indptr[i];
        }

        let mut cursor = indptr.clone();
        let mut indices = vec![0usize; triplets.len()];
        let mut values = vec![0.0; triplets.len()];
        for &(row, col, value) in triplets {
            let slot = cursor[row];
            indices[slot] = col;
            values[slot] = value;
            cursor[row] += 1;
        }

        Self {
            n_rows,
            n_cols,
            indptr,
            indices,
            values,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Column indices and values stored in row `row`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let span = self.indptr[row]..self.indptr[row + 1];
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.values[span].iter().copied())
    }

    /// Sum of all entries stored at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.n_rows {
            return 0.0;
        }
        self.row(row).filter(|&(c, _)| c == col).map(|(_, v)| v).sum()
    }

    pub fn transpose(&self) -> Self {
        let mut triplets = Vec::with_capacity(self.nnz());
        for row in 0..self.n_rows {
            for (col, value) in self.row(row) {
                triplets.push((col, row, value));
            }
        }
        Self::assemble(self.n_cols, self.n_rows, &triplets)
    }

    /// `self * x` for a dense vector. Cost is O(nnz).
    pub fn mul_vec(&self, x: &[f64]) -> Result<Vec<f64>> {
        if x.len() != self.n_cols {
            return Err(GeneSimError::DimensionMismatch {
                expected: self.n_cols,
                actual: x.len(),
            });
        }
        Ok((0..self.n_rows)
            .map(|row| self.row(row).map(|(col, w)| w * x[col]).sum())
            .collect())
    }

    /// Applies the matrix to every row of `batch` at once: row `r` of the
    /// result is `self * batch[r]`, i.e. `batch * self^T`.
    pub fn mul_rows(&self, batch: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut out = Array2::<f64>::zeros((batch.nrows(), self.n_rows));
        self.mul_rows_into(batch, out.view_mut())?;
        Ok(out)
    }

    /// `mul_rows` writing into `out`, which must be `batch.nrows() x n_rows`.
    pub fn mul_rows_into(&self, batch: ArrayView2<f64>, mut out: ArrayViewMut2<f64>) -> Result<()> {
        if batch.ncols() != self.n_cols {
            return Err(GeneSimError::DimensionMismatch {
                expected: self.n_cols,
                actual: batch.ncols(),
            });
        }
        if out.dim() != (batch.nrows(), self.n_rows) {
            return Err(GeneSimError::DimensionMismatch {
                expected: batch.nrows() * self.n_rows,
                actual: out.len(),
            });
        }
        let zip = Zip::from(out.rows_mut()).and(batch.rows());

        #[cfg(feature = "parallel")]
        zip.par_for_each(|out_row, in_row| self.apply_to_row(in_row, out_row));
        #[cfg(not(feature = "parallel"))]
        zip.for_each(|out_row, in_row| self.apply_to_row(in_row, out_row));

        Ok(())
    }

    fn apply_to_row(&self, input: ArrayView1<f64>, mut output: ArrayViewMut1<f64>) {
        for target in 0..self.n_rows {
            let mut acc = 0.0;
            for slot in self.indptr[target]..self.indptr[target + 1] {
                acc += self.values[slot] * input[self.indices[slot]];
            }
            output[target] = acc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> CsrMatrix {
        // [[0, 0, 0],
        //  [0.5, 0, 0],
        //  [0.8, 0.25, 0]]
        CsrMatrix::from_triplets(3, 3, &[(2, 1, 0.25), (1, 0, 0.5), (2, 0, 0.8)]).unwrap()
    }

    #[test]
    fn test_layout() {
        let m = sample();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).count(), 0);
        assert_eq!(m.row(2).collect::<Vec<_>>(), vec![(1, 0.25), (0, 0.8)]);
        assert_eq!(m.get(1, 0), 0.5);
        assert_eq!(m.get(0, 1), 0.0);
    }

    #[test]
    fn test_duplicates_accumulate() {
        let m = CsrMatrix::from_triplets(2, 2, &[(0, 1, 1.0), (0, 1, 2.0)]).unwrap();
        assert_eq!(m.get(0, 1), 3.0);
        assert_eq!(m.mul_vec(&[0.0, 2.0]).unwrap(), vec![6.0, 0.0]);
    }

    #[test]
    fn test_out_of_range_entry() {
        assert!(CsrMatrix::from_triplets(2, 2, &[(2, 0, 1.0)]).is_err());
    }

    #[test]
    fn test_mul_vec_and_rows_agree() {
        let m = sample();
        let batch = array![[1.0, 0.5, 0.2], [0.0, 2.0, 1.0]];
        let out = m.mul_rows(batch.view()).unwrap();
        for (r, row) in batch.rows().into_iter().enumerate() {
            let single = m.mul_vec(row.as_slice().unwrap()).unwrap();
            assert_eq!(out.row(r).to_vec(), single);
        }
        assert!((out[[0, 2]] - (0.8 + 0.125)).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let m = sample();
        assert!(matches!(
            m.mul_vec(&[1.0, 2.0]),
            Err(GeneSimError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        let batch = Array2::<f64>::zeros((4, 2));
        assert!(m.mul_rows(batch.view()).is_err());

        let batch = Array2::<f64>::zeros((4, 3));
        let mut wrong_out = Array2::<f64>::zeros((3, 3));
        assert!(m.mul_rows_into(batch.view(), wrong_out.view_mut()).is_err());
    }

    #[test]
    fn test_mul_rows_into_overwrites_buffer() {
        let m = sample();
        let batch = array![[1.0, 0.5, 0.2], [0.0, 2.0, 1.0]];
        let mut out = Array2::from_elem((2, 3), 99.0);
        m.mul_rows_into(batch.view(), out.view_mut()).unwrap();
        assert_eq!(out, m.mul_rows(batch.view()).unwrap());
    }

    #[test]
    fn test_transpose() {
        let t = sample().transpose();
        assert_eq!(t.get(0, 1), 0.5);
        assert_eq!(t.get(0, 2), 0.8);
        assert_eq!(t.get(1, 2), 0.25);
        assert_eq!(t.row(0).count(), 2);
    }
}
