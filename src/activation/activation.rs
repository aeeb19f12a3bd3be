use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::math::targets::Predictions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivationFunction {
    ReLU,
    /// Row-wise softmax; every output row is a probability distribution.
    Softmax,
    Sigmoid,
    Linear,
}

impl ActivationFunction {
    /// Applies the activation to a whole batch.
    pub fn apply(&self, inputs: &Matrix) -> Matrix {
        match self {
            ActivationFunction::ReLU => inputs.map(|x| x.max(0.0)),
            ActivationFunction::Softmax => softmax_rows(inputs),
            ActivationFunction::Sigmoid => inputs.map(|x| 1.0 / (1.0 + (-x).exp())),
            ActivationFunction::Linear => inputs.clone(),
        }
    }
}

/// Numerically stable softmax: the row max is subtracted before exponentiating.
/// A row holding `+inf` puts all its mass on the first infinite entry.
fn softmax_rows(inputs: &Matrix) -> Matrix {
    let data = inputs.data.iter()
        .map(|row| {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == f64::INFINITY {
                let hot = row.iter().position(|&x| x == f64::INFINITY);
                return (0..row.len()).map(|i| if Some(i) == hot { 1.0 } else { 0.0 }).collect();
            }
            let exps: Vec<f64> = row.iter().map(|x| (x - max).exp()).collect();
            let total: f64 = exps.iter().sum();
            exps.into_iter().map(|e| e / total).collect()
        })
        .collect();
    Matrix { rows: inputs.rows, cols: inputs.cols, data }
}

/// An activation node in the model pipeline.
///
/// Keeps the last batch it saw (`inputs`, `output`) so that `backward` can
/// derive `dinputs` from the gradient handed back by the next node.
#[derive(Debug, Clone)]
pub struct Activation {
    pub function: ActivationFunction,
    inputs: Matrix,
    pub output: Matrix,
    pub dinputs: Matrix,
}

impl Activation {
    pub fn new(function: ActivationFunction) -> Activation {
        Activation {
            function,
            inputs: Matrix::default(),
            output: Matrix::default(),
            dinputs: Matrix::default(),
        }
    }

    pub fn forward(&mut self, inputs: &Matrix) {
        self.output = self.function.apply(inputs);
        self.inputs = inputs.clone();
    }

    pub fn backward(&mut self, dvalues: &Matrix) -> Result<()> {
        if dvalues.shape() != self.output.shape() {
            return Err(NnError::shape("Activation::backward", self.output.shape(), dvalues.shape()));
        }
        self.dinputs = match self.function {
            // Gradient passes only where the input was strictly positive.
            ActivationFunction::ReLU => dvalues.zip_map(&self.inputs, |d, x| if x <= 0.0 { 0.0 } else { d })?,
            ActivationFunction::Softmax => softmax_backward(&self.output, dvalues),
            ActivationFunction::Sigmoid => dvalues.zip_map(&self.output, |d, s| d * (1.0 - s) * s)?,
            ActivationFunction::Linear => dvalues.clone(),
        };
        Ok(())
    }

    /// Decodes raw outputs into the form accuracy metrics compare against.
    pub fn predictions(&self, outputs: &Matrix) -> Predictions {
        match self.function {
            ActivationFunction::Softmax => Predictions::Classes(outputs.argmax_rows()),
            ActivationFunction::Sigmoid => Predictions::Values(outputs.map(|x| if x > 0.5 { 1.0 } else { 0.0 })),
            ActivationFunction::ReLU | ActivationFunction::Linear => Predictions::Values(outputs.clone()),
        }
    }
}

/// Per-sample Jacobian `diag(s) - s·sᵀ` applied to that sample's gradient row.
///
/// Row `i` of the product is `s_i * (d_i - Σ_k s_k d_k)`, which avoids
/// materialising the `n × n` Jacobian for every sample.
fn softmax_backward(output: &Matrix, dvalues: &Matrix) -> Matrix {
    let data = output.data.iter().zip(dvalues.data.iter())
        .map(|(s, d)| {
            let weighted: f64 = s.iter().zip(d.iter()).map(|(s_k, d_k)| s_k * d_k).sum();
            s.iter().zip(d.iter()).map(|(s_i, d_i)| s_i * (d_i - weighted)).collect()
        })
        .collect();
    Matrix { rows: output.rows, cols: output.cols, data }
}
