use crate::error::Result;
use crate::loss::loss_type::batch_dims;
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

pub struct MaeLoss;

impl MaeLoss {
    /// Per-sample loss: mean over outputs of `|y - p|`.
    pub fn forward(y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        let y = y_true.values();
        batch_dims("MaeLoss::forward", y_pred, &y)?;
        Ok(y_pred.data.iter().zip(y.data.iter())
            .map(|(p, t)| {
                p.iter().zip(t.iter()).map(|(p, t)| (t - p).abs()).sum::<f64>() / p.len() as f64
            })
            .collect())
    }

    /// Subgradient: `sign(p - y) / outputs / samples` (0 when equal)
    pub fn backward(dvalues: &Matrix, y_true: &Targets) -> Result<Matrix> {
        let y = y_true.values();
        let (samples, outputs) = batch_dims("MaeLoss::backward", dvalues, &y)?;
        let norm = (samples * outputs) as f64;
        dvalues.zip_map(&y, |p, t| {
            let diff = p - t;
            let sign = if diff > 0.0 { 1.0 } else if diff < 0.0 { -1.0 } else { 0.0 };
            sign / norm
        })
    }
}
