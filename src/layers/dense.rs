use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// L1/L2 penalty strengths for a dense layer. A strength of `0.0` disables that term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Regularization {
    #[serde(default)]
    pub weight_l1: f64,
    #[serde(default)]
    pub weight_l2: f64,
    #[serde(default)]
    pub bias_l1: f64,
    #[serde(default)]
    pub bias_l2: f64,
}

/// Fully connected layer: `output = inputs · weights + biases`.
///
/// Shapes: `weights` is `n_inputs × n_neurons`, `biases` is `1 × n_neurons`.
#[derive(Debug, Clone)]
pub struct Dense {
    pub weights: Matrix,
    pub biases: Matrix,
    pub regularization: Regularization,
    inputs: Matrix,
    pub output: Matrix,
    pub dweights: Matrix,
    pub dbiases: Matrix,
    pub dinputs: Matrix,
}

impl Dense {
    /// Weights drawn from `0.1 * N(0, 1)`, biases start at zero.
    pub fn new(n_inputs: usize, n_neurons: usize) -> Dense {
        Dense::with_rng(n_inputs, n_neurons, &mut rand::thread_rng())
    }

    /// Same as [`Dense::new`] but draws from a caller-supplied RNG.
    pub fn with_rng<R: Rng + ?Sized>(n_inputs: usize, n_neurons: usize, rng: &mut R) -> Dense {
        let weights = Matrix::randn(n_inputs, n_neurons, 0.1, rng);
        let biases = Matrix::zeros(1, n_neurons);
        Dense::build(weights, biases)
    }

    pub fn from_parameters(weights: Matrix, biases: Matrix) -> Result<Dense> {
        if biases.rows != 1 || biases.cols != weights.cols {
            return Err(NnError::shape("Dense::from_parameters", (1, weights.cols), biases.shape()));
        }
        Ok(Dense::build(weights, biases))
    }

    pub fn with_regularization(mut self, regularization: Regularization) -> Dense {
        self.regularization = regularization;
        self
    }

    fn build(weights: Matrix, biases: Matrix) -> Dense {
        Dense {
            weights,
            biases,
            regularization: Regularization::default(),
            inputs: Matrix::default(),
            output: Matrix::default(),
            dweights: Matrix::default(),
            dbiases: Matrix::default(),
            dinputs: Matrix::default(),
        }
    }

    pub fn n_inputs(&self) -> usize {
        self.weights.rows
    }

    pub fn n_neurons(&self) -> usize {
        self.weights.cols
    }

    pub fn forward(&mut self, inputs: &Matrix) -> Result<()> {
        if inputs.cols != self.n_inputs() {
            return Err(NnError::shape(
                "Dense::forward",
                (inputs.rows, self.n_inputs()),
                inputs.shape(),
            ));
        }
        self.output = inputs.dot(&self.weights)?.add_row(&self.biases)?;
        self.inputs = inputs.clone();
        Ok(())
    }

    pub fn backward(&mut self, dvalues: &Matrix) -> Result<()> {
        if dvalues.rows != self.inputs.rows || dvalues.cols != self.n_neurons() {
            return Err(NnError::shape(
                "Dense::backward",
                (self.inputs.rows, self.n_neurons()),
                dvalues.shape(),
            ));
        }

        let mut dweights = self.inputs.transpose().dot(dvalues)?;
        let mut dbiases = dvalues.sum_rows();

        let reg = self.regularization;
        add_penalty_gradient(&mut dweights, &self.weights, reg.weight_l1, reg.weight_l2)?;
        add_penalty_gradient(&mut dbiases, &self.biases, reg.bias_l1, reg.bias_l2)?;

        self.dinputs = dvalues.dot(&self.weights.transpose())?;
        self.dweights = dweights;
        self.dbiases = dbiases;
        Ok(())
    }

    /// Checks that `dweights`/`dbiases` line up with the parameters they update.
    pub fn ensure_gradients(&self) -> Result<()> {
        if self.dweights.shape() != self.weights.shape() {
            return Err(NnError::shape("Dense weight gradients", self.weights.shape(), self.dweights.shape()));
        }
        if self.dbiases.shape() != self.biases.shape() {
            return Err(NnError::shape("Dense bias gradients", self.biases.shape(), self.dbiases.shape()));
        }
        Ok(())
    }
}

/// L1 contributes `l1 * sign(p)` (with `sign(0) = +1`), L2 contributes `2 * l2 * p`.
fn add_penalty_gradient(grad: &mut Matrix, params: &Matrix, l1: f64, l2: f64) -> Result<()> {
    if l1 > 0.0 {
        grad.zip_apply(params, |g, p| *g += l1 * if p < 0.0 { -1.0 } else { 1.0 })?;
    }
    if l2 > 0.0 {
        grad.zip_apply(params, |g, p| *g += 2.0 * l2 * p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn m(data: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_data(data).unwrap()
    }

    fn layer() -> Dense {
        Dense::from_parameters(
            m(vec![vec![1.0, -1.0], vec![0.5, 0.0]]),
            Matrix::row_vector(vec![0.1, 0.2]),
        ).unwrap()
    }

    #[test]
    fn forward_adds_bias_to_every_sample() {
        let mut dense = layer();
        dense.forward(&m(vec![vec![1.0, 2.0], vec![0.0, 0.0]])).unwrap();
        let expected = m(vec![vec![2.1, -0.8], vec![0.1, 0.2]]);
        for (a, b) in dense.output.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn forward_rejects_wrong_feature_count() {
        let mut dense = layer();
        let err = dense.forward(&Matrix::zeros(4, 3));
        assert!(matches!(err, Err(NnError::ShapeMismatch { .. })));
    }

    #[test]
    fn backward_computes_parameter_and_input_gradients() {
        let mut dense = layer();
        dense.forward(&m(vec![vec![1.0, 2.0], vec![3.0, 4.0]])).unwrap();
        dense.backward(&m(vec![vec![1.0, 0.0], vec![0.0, 1.0]])).unwrap();
        assert_eq!(dense.dweights, m(vec![vec![1.0, 3.0], vec![2.0, 4.0]]));
        assert_eq!(dense.dbiases, Matrix::row_vector(vec![1.0, 1.0]));
        assert_eq!(dense.dinputs, m(vec![vec![1.0, 0.5], vec![-1.0, 0.0]]));
    }

    #[test]
    fn l1_gradient_treats_zero_weight_as_positive() {
        let mut dense = layer().with_regularization(Regularization { weight_l1: 0.5, ..Default::default() });
        dense.forward(&Matrix::zeros(1, 2)).unwrap();
        dense.backward(&Matrix::zeros(1, 2)).unwrap();
        // weights: [[1, -1], [0.5, 0]]
        assert_eq!(dense.dweights, m(vec![vec![0.5, -0.5], vec![0.5, 0.5]]));
        assert_eq!(dense.dbiases, Matrix::zeros(1, 2));
    }

    #[test]
    fn l2_gradient_is_twice_strength_times_parameter() {
        let mut dense = layer().with_regularization(Regularization { bias_l2: 1.0, ..Default::default() });
        dense.forward(&Matrix::zeros(1, 2)).unwrap();
        dense.backward(&Matrix::zeros(1, 2)).unwrap();
        assert_eq!(dense.dbiases, Matrix::row_vector(vec![0.2, 0.4]));
    }

    #[test]
    fn gradients_missing_before_backward() {
        assert!(layer().ensure_gradients().is_err());
    }
}
