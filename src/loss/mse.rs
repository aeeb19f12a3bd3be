use crate::error::Result;
use crate::loss::loss_type::batch_dims;
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

pub struct MseLoss;

impl MseLoss {
    /// Per-sample loss: mean over outputs of `(y - p)²`.
    pub fn forward(y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        let y = y_true.values();
        batch_dims("MseLoss::forward", y_pred, &y)?;
        Ok(y_pred.data.iter().zip(y.data.iter())
            .map(|(p, t)| {
                p.iter().zip(t.iter()).map(|(p, t)| (t - p).powi(2)).sum::<f64>() / p.len() as f64
            })
            .collect())
    }

    /// Gradient: `-2 (y - p) / outputs / samples`
    pub fn backward(dvalues: &Matrix, y_true: &Targets) -> Result<Matrix> {
        let y = y_true.values();
        let (samples, outputs) = batch_dims("MseLoss::backward", dvalues, &y)?;
        let norm = (samples * outputs) as f64;
        dvalues.zip_map(&y, |p, t| -2.0 * (t - p) / norm)
    }
}
