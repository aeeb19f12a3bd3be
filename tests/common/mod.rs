#![allow(dead_code)]

use ferrite_model::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform samples in `[lo, hi)` from a fixed seed.
pub fn uniform_matrix(rows: usize, cols: usize, lo: f64, hi: f64, seed: u64) -> Matrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..rows)
        .map(|_| (0..cols).map(|_| rng.gen_range(lo..hi)).collect())
        .collect();
    Matrix::from_data(data).unwrap()
}

/// Central finite-difference gradient of `f` at `at`.
pub fn numeric_gradient<F>(at: &Matrix, mut f: F) -> Matrix
where
    F: FnMut(&Matrix) -> f64,
{
    let h = 1e-6;
    let mut grad = Matrix::zeros(at.rows, at.cols);
    for i in 0..at.rows {
        for j in 0..at.cols {
            let mut plus = at.clone();
            plus.data[i][j] += h;
            let mut minus = at.clone();
            minus.data[i][j] -= h;
            grad.data[i][j] = (f(&plus) - f(&minus)) / (2.0 * h);
        }
    }
    grad
}

/// Element-wise agreement within `1e-4` relative error (plus a small absolute floor).
pub fn assert_gradients_close(analytic: &Matrix, numeric: &Matrix) {
    assert_eq!(analytic.shape(), numeric.shape(), "gradient shapes differ");
    for (a, n) in analytic.iter().zip(numeric.iter()) {
        let scale = a.abs().max(n.abs()).max(1.0);
        assert!(
            (a - n).abs() <= 1e-4 * scale,
            "analytic {a} vs numeric {n}"
        );
    }
}

/// Sum of the element-wise product, a scalar objective `L = Σ out ⊙ r`
/// whose gradient w.r.t. `out` is exactly `r`.
pub fn weighted_sum(out: &Matrix, r: &Matrix) -> f64 {
    out.zip_map(r, |a, b| a * b).unwrap().sum()
}

/// Two linearly separable classes, four points each.
pub fn separable_dataset() -> (Matrix, Vec<usize>) {
    let x = Matrix::from_data(vec![
        vec![-1.0, -1.0],
        vec![-1.5, -0.5],
        vec![-0.5, -1.5],
        vec![-1.2, -0.8],
        vec![1.0, 1.0],
        vec![1.5, 0.5],
        vec![0.5, 1.5],
        vec![1.2, 0.8],
    ])
    .unwrap();
    (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
}
