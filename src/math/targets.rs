use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Ground-truth values paired with a batch of inputs.
///
/// - `Sparse`: one class index per sample.
/// - `Dense`: one row per sample: one-hot class rows, binary 0/1 columns,
///   or regression targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    Sparse(Vec<usize>),
    Dense(Matrix),
}

impl Targets {
    /// Number of samples described.
    pub fn len(&self) -> usize {
        match self {
            Targets::Sparse(indices) => indices.len(),
            Targets::Dense(m) => m.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Class index per sample; dense rows are decoded with argmax.
    pub fn class_indices(&self) -> Vec<usize> {
        match self {
            Targets::Sparse(indices) => indices.clone(),
            Targets::Dense(m) => m.argmax_rows(),
        }
    }

    /// One-hot rows of width `n_classes`. Dense targets must already be that wide.
    pub fn one_hot(&self, n_classes: usize) -> Result<Matrix> {
        match self {
            Targets::Sparse(indices) => {
                let mut res = Matrix::zeros(indices.len(), n_classes);
                for (row, &class) in indices.iter().enumerate() {
                    if class >= n_classes {
                        return Err(NnError::InvalidInput(format!(
                            "class index {class} out of range for {n_classes} classes"
                        )));
                    }
                    res.data[row][class] = 1.0;
                }
                Ok(res)
            }
            Targets::Dense(m) => {
                if m.cols != n_classes {
                    return Err(NnError::shape("Targets::one_hot", (m.rows, n_classes), m.shape()));
                }
                Ok(m.clone())
            }
        }
    }

    /// Targets as a numeric matrix; sparse labels become an `n × 1` column.
    pub fn values(&self) -> Matrix {
        match self {
            Targets::Sparse(indices) => Matrix::column(indices.iter().map(|&i| i as f64).collect()),
            Targets::Dense(m) => m.clone(),
        }
    }
}

impl From<Vec<usize>> for Targets {
    fn from(indices: Vec<usize>) -> Self {
        Targets::Sparse(indices)
    }
}

impl From<Matrix> for Targets {
    fn from(m: Matrix) -> Self {
        Targets::Dense(m)
    }
}

/// Decoded model outputs, as produced by an activation's `predictions`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predictions {
    /// Argmax class per sample (Softmax).
    Classes(Vec<usize>),
    /// Per-element values: raw outputs (ReLU, Linear) or 0/1 decisions (Sigmoid).
    Values(Matrix),
}

impl Predictions {
    pub fn len(&self) -> usize {
        match self {
            Predictions::Classes(c) => c.len(),
            Predictions::Values(m) => m.rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_labels_expand_to_one_hot() {
        let t = Targets::Sparse(vec![2, 0]);
        let oh = t.one_hot(3).unwrap();
        assert_eq!(oh.data, vec![vec![0.0, 0.0, 1.0], vec![1.0, 0.0, 0.0]]);
    }

    #[test]
    fn out_of_range_class_is_rejected() {
        let t = Targets::Sparse(vec![3]);
        assert!(matches!(t.one_hot(3), Err(NnError::InvalidInput(_))));
    }

    #[test]
    fn dense_one_hot_decodes_to_indices() {
        let t = Targets::Dense(Matrix::from_data(vec![vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap());
        assert_eq!(t.class_indices(), vec![1, 0]);
        assert_eq!(t.len(), 2);
    }
}
