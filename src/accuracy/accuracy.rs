use serde::{Serialize, Deserialize};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::math::targets::{Predictions, Targets};

/// Fraction of predictions that match the ground truth.
///
/// - `Categorical`: class indices must match. With `binary`, every output
///   column is a separate 0/1 decision compared against a 0/1 target column.
/// - `Regression`: a value counts as correct when it lies within
///   `precision = std(y) / 250` of its target. The tolerance is derived from
///   the first targets seen (or on an explicit re-init).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Accuracy {
    Categorical {
        #[serde(default)]
        binary: bool,
    },
    Regression {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        precision: Option<f64>,
    },
}

impl Accuracy {
    pub fn categorical() -> Accuracy {
        Accuracy::Categorical { binary: false }
    }

    pub fn binary() -> Accuracy {
        Accuracy::Categorical { binary: true }
    }

    pub fn regression() -> Accuracy {
        Accuracy::Regression { precision: None }
    }

    /// Prepares the metric for `y`. Categorical accuracy needs nothing.
    pub fn init(&mut self, y: &Targets, reinit: bool) -> Result<()> {
        if let Accuracy::Regression { precision } = self {
            if precision.is_none() || reinit {
                if y.is_empty() {
                    return Err(NnError::InvalidInput("regression accuracy needs at least one target".into()));
                }
                *precision = Some(y.values().std() / 250.0);
            }
        }
        Ok(())
    }

    /// Element-wise correctness of `predictions` against `y`.
    pub fn compare(&self, predictions: &Predictions, y: &Targets) -> Result<Vec<bool>> {
        if predictions.len() != y.len() {
            return Err(NnError::shape("Accuracy::compare", (y.len(), 1), (predictions.len(), 1)));
        }
        match *self {
            Accuracy::Categorical { binary: false } => {
                let predicted = match predictions {
                    Predictions::Classes(classes) => classes.clone(),
                    Predictions::Values(values) => values.argmax_rows(),
                };
                Ok(predicted.iter().zip(y.class_indices()).map(|(p, t)| *p == t).collect())
            }
            Accuracy::Categorical { binary: true } => {
                elementwise(predictions, y, |p, t| p == t)
            }
            Accuracy::Regression { precision } => {
                let precision = precision.ok_or_else(|| {
                    NnError::InvalidState("regression accuracy used before init".into())
                })?;
                elementwise(predictions, y, |p, t| (p - t).abs() < precision)
            }
        }
    }

    /// Mean of the comparison vector; initializes the metric on first use.
    pub fn calculate(&mut self, predictions: &Predictions, y: &Targets) -> Result<f64> {
        self.init(y, false)?;
        let comparisons = self.compare(predictions, y)?;
        if comparisons.is_empty() {
            return Err(NnError::InvalidInput("accuracy over an empty batch".into()));
        }
        let correct = comparisons.iter().filter(|&&c| c).count();
        Ok(correct as f64 / comparisons.len() as f64)
    }
}

fn elementwise<F>(predictions: &Predictions, y: &Targets, matches: F) -> Result<Vec<bool>>
where
    F: Fn(f64, f64) -> bool,
{
    let values = match predictions {
        Predictions::Values(values) => values.clone(),
        Predictions::Classes(classes) => Matrix::column(classes.iter().map(|&c| c as f64).collect()),
    };
    let targets = y.values();
    if values.shape() != targets.shape() {
        return Err(NnError::shape("Accuracy::compare", targets.shape(), values.shape()));
    }
    Ok(values.iter().zip(targets.iter()).map(|(&p, &t)| matches(p, t)).collect())
}
