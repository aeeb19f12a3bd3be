use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::layers::dense::Dense;
use crate::loss::bce::BceLoss;
use crate::loss::cross_entropy::CrossEntropyLoss;
use crate::loss::mae::MaeLoss;
use crate::loss::mse::MseLoss;
use crate::loss::regularization::regularization_loss;
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

/// Predictions are clipped to `[CLIP_EPS, 1 - CLIP_EPS]` before any log.
pub(crate) const CLIP_EPS: f64 = 1e-7;

/// Selects which loss function the model trains against.
///
/// - `MeanSquaredError`: pair with a Linear output.
/// - `MeanAbsoluteError`: pair with a Linear output.
/// - `BinaryCrossentropy`: pair with a Sigmoid output and 0/1 targets.
/// - `CategoricalCrossentropy`: pair with a Softmax output; the model then
///   uses the fused softmax/cross-entropy gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossType {
    MeanSquaredError,
    MeanAbsoluteError,
    BinaryCrossentropy,
    CategoricalCrossentropy,
}

/// Mean data loss and the regularization penalty of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LossValue {
    pub data: f64,
    pub regularization: f64,
}

impl LossValue {
    pub fn total(&self) -> f64 {
        self.data + self.regularization
    }
}

impl LossType {
    /// Loss of every sample in the batch.
    pub fn forward(&self, y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        match self {
            LossType::MeanSquaredError        => MseLoss::forward(y_pred, y_true),
            LossType::MeanAbsoluteError       => MaeLoss::forward(y_pred, y_true),
            LossType::BinaryCrossentropy      => BceLoss::forward(y_pred, y_true),
            LossType::CategoricalCrossentropy => CrossEntropyLoss::forward(y_pred, y_true),
        }
    }

    /// Gradient of the mean loss w.r.t. the predictions (`dinputs`).
    pub fn backward(&self, dvalues: &Matrix, y_true: &Targets) -> Result<Matrix> {
        match self {
            LossType::MeanSquaredError        => MseLoss::backward(dvalues, y_true),
            LossType::MeanAbsoluteError       => MaeLoss::backward(dvalues, y_true),
            LossType::BinaryCrossentropy      => BceLoss::backward(dvalues, y_true),
            LossType::CategoricalCrossentropy => CrossEntropyLoss::backward(dvalues, y_true),
        }
    }

    /// Averages the per-sample losses and, when asked, adds the L1/L2
    /// penalty of `layers`.
    pub fn calculate<'a, I>(
        &self,
        output: &Matrix,
        y: &Targets,
        layers: I,
        include_regularization: bool,
    ) -> Result<LossValue>
    where
        I: IntoIterator<Item = &'a Dense>,
    {
        let sample_losses = self.forward(output, y)?;
        let data = sample_losses.iter().sum::<f64>() / sample_losses.len() as f64;
        let regularization = if include_regularization {
            regularization_loss(layers)
        } else {
            0.0
        };
        Ok(LossValue { data, regularization })
    }
}

/// Validates a prediction/target pair and returns `(samples, outputs)`.
pub(crate) fn batch_dims(context: &str, y_pred: &Matrix, y_true: &Matrix) -> Result<(usize, usize)> {
    if y_pred.is_empty() {
        return Err(NnError::InvalidInput(format!("{context}: empty batch")));
    }
    if y_pred.shape() != y_true.shape() {
        return Err(NnError::shape(context, y_pred.shape(), y_true.shape()));
    }
    Ok(y_pred.shape())
}
