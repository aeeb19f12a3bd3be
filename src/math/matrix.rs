use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};

/// Dense row-major matrix of `f64`.
///
/// Rows are samples and columns are features everywhere in this crate, so a
/// batch of `n` inputs with `k` features is an `n × k` matrix and a bias
/// vector is a `1 × k` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![value; cols]; rows]
        }
    }

    /// Builds a matrix from row vectors. Every row must have the same length.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let rows = data.len();
        let cols = data.first().map_or(0, |row| row.len());
        if let Some(bad) = data.iter().find(|row| row.len() != cols) {
            return Err(NnError::shape("Matrix::from_data", (rows, cols), (rows, bad.len())));
        }
        Ok(Matrix { rows, cols, data })
    }

    /// A single `1 × n` row.
    pub fn row_vector(values: Vec<f64>) -> Matrix {
        Matrix { rows: 1, cols: values.len(), data: vec![values] }
    }

    /// An `n × 1` column.
    pub fn column(values: Vec<f64>) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.into_iter().map(|v| vec![v]).collect(),
        }
    }

    /// Samples every entry from `scale * N(0, 1)`.
    pub fn randn<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let data = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| scale * rng.sample::<f64, _>(StandardNormal))
                    .collect()
            })
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &f64> + '_ {
        self.data.iter().flatten()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// Element-wise combination of two same-shape matrices.
    pub fn zip_map<F>(&self, other: &Matrix, functor: F) -> Result<Matrix>
    where
        F: Fn(f64, f64) -> f64,
    {
        self.ensure_same_shape(other, "Matrix::zip_map")?;
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().zip(other.data.iter())
                .map(|(row_a, row_b)| {
                    row_a.iter().zip(row_b.iter()).map(|(&a, &b)| functor(a, b)).collect()
                })
                .collect(),
        })
    }

    /// In-place element-wise update from a same-shape matrix.
    pub fn zip_apply<F>(&mut self, other: &Matrix, functor: F) -> Result<()>
    where
        F: Fn(&mut f64, f64),
    {
        self.ensure_same_shape(other, "Matrix::zip_apply")?;
        for (row_a, row_b) in self.data.iter_mut().zip(other.data.iter()) {
            for (a, &b) in row_a.iter_mut().zip(row_b.iter()) {
                functor(a, b);
            }
        }
        Ok(())
    }

    /// Matrix product `self · rhs`.
    pub fn dot(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(NnError::shape("Matrix::dot", (self.cols, rhs.cols), rhs.shape()));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let a = self.data[i][k];
                if a == 0.0 {
                    continue;
                }
                for j in 0..res.cols {
                    res.data[i][j] += a * rhs.data[k][j];
                }
            }
        }

        Ok(res)
    }

    /// Adds a `1 × cols` row to every row.
    pub fn add_row(&self, row: &Matrix) -> Result<Matrix> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(NnError::shape("Matrix::add_row", (1, self.cols), row.shape()));
        }
        let bias = &row.data[0];
        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data
                .iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
                .collect(),
        })
    }

    /// Column sums, kept as a `1 × cols` row.
    pub fn sum_rows(&self) -> Matrix {
        let mut sums = vec![0.0; self.cols];
        for row in &self.data {
            for (s, x) in sums.iter_mut().zip(row.iter()) {
                *s += x;
            }
        }
        Matrix::row_vector(sums)
    }

    pub fn sum(&self) -> f64 {
        self.iter().sum()
    }

    /// Mean over all entries; `0.0` for an empty matrix.
    pub fn mean(&self) -> f64 {
        let n = self.rows * self.cols;
        if n == 0 {
            return 0.0;
        }
        self.sum() / n as f64
    }

    /// Population standard deviation over all entries.
    pub fn std(&self) -> f64 {
        let n = self.rows * self.cols;
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        var.sqrt()
    }

    pub fn clip(&self, lo: f64, hi: f64) -> Matrix {
        self.map(|x| x.clamp(lo, hi))
    }

    /// Index of the largest entry in each row. Ties resolve to the first index.
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter().map(|row| argmax(row)).collect()
    }

    fn ensure_same_shape(&self, other: &Matrix, context: &str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(NnError::shape(context, self.shape(), other.shape()));
        }
        Ok(())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Index of the maximum element in a slice.
pub(crate) fn argmax(v: &[f64]) -> usize {
    let mut best = 0;
    for (i, x) in v.iter().enumerate() {
        if *x > v[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    #[test]
    fn dot_matches_hand_computation() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = m(vec![vec![5.0], vec![6.0]]);
        assert_eq!(a.dot(&b).unwrap(), m(vec![vec![17.0], vec![39.0]]));
    }

    #[test]
    fn dot_rejects_incompatible_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(a.dot(&b), Err(NnError::ShapeMismatch { .. })));
    }

    #[test]
    fn add_row_broadcasts_over_samples() {
        let a = m(vec![vec![1.0, 1.0], vec![2.0, 2.0]]);
        let bias = Matrix::row_vector(vec![0.5, -1.0]);
        assert_eq!(
            a.add_row(&bias).unwrap(),
            m(vec![vec![1.5, 0.0], vec![2.5, 1.0]])
        );
    }

    #[test]
    fn sum_rows_keeps_row_shape() {
        let a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let s = a.sum_rows();
        assert_eq!(s.shape(), (1, 2));
        assert_eq!(s.data[0], vec![9.0, 12.0]);
    }

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(err.is_err());
    }

    #[test]
    fn std_is_population_std() {
        let a = Matrix::column(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((a.std() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let a = m(vec![vec![1.0, 3.0, 3.0], vec![0.0, 0.0, 0.0]]);
        assert_eq!(a.argmax_rows(), vec![1, 0]);
    }

    #[test]
    fn randn_is_reproducible_with_a_seed() {
        let a = Matrix::randn(3, 4, 0.1, &mut StdRng::seed_from_u64(7));
        let b = Matrix::randn(3, 4, 0.1, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.abs() < 1.0));
    }
}
