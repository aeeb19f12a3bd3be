use crate::error::{NnError, Result};
use crate::loss::loss_type::CLIP_EPS;
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

/// Categorical cross-entropy. Labels may be sparse class indices or one-hot rows.
pub struct CrossEntropyLoss;

impl CrossEntropyLoss {
    /// Per-sample loss: `-ln(confidence of the true class)`, predictions clipped
    /// to `[1e-7, 1 - 1e-7]` so the log stays finite.
    pub fn forward(y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        check_labels("CrossEntropyLoss::forward", y_pred, y_true)?;
        let clipped = y_pred.clip(CLIP_EPS, 1.0 - CLIP_EPS);
        let one_hot = y_true.one_hot(y_pred.cols)?;
        Ok(clipped.data.iter().zip(one_hot.data.iter())
            .map(|(p, t)| {
                let confidence: f64 = p.iter().zip(t.iter()).map(|(p, t)| p * t).sum();
                -confidence.ln()
            })
            .collect())
    }

    /// Gradient w.r.t. the probabilities: `-y / p / samples`.
    ///
    /// `dvalues` is not clipped here. Callers using this outside the fused
    /// softmax path must make sure no probability is exactly zero.
    pub fn backward(dvalues: &Matrix, y_true: &Targets) -> Result<Matrix> {
        check_labels("CrossEntropyLoss::backward", dvalues, y_true)?;
        let samples = dvalues.rows as f64;
        let one_hot = y_true.one_hot(dvalues.cols)?;
        dvalues.zip_map(&one_hot, |p, t| -t / p / samples)
    }
}

fn check_labels(context: &str, y_pred: &Matrix, y_true: &Targets) -> Result<()> {
    if y_pred.is_empty() {
        return Err(NnError::InvalidInput(format!("{context}: empty batch")));
    }
    if y_true.len() != y_pred.rows {
        return Err(NnError::shape(context, (y_pred.rows, y_pred.cols), (y_true.len(), y_pred.cols)));
    }
    Ok(())
}
