use crate::error::Result;
use crate::loss::loss_type::{batch_dims, CLIP_EPS};
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

pub struct BceLoss;

impl BceLoss {
    /// Per-sample loss: mean over outputs of `-(y·ln p + (1-y)·ln(1-p))`,
    /// with `p` clipped to `[1e-7, 1 - 1e-7]`.
    pub fn forward(y_pred: &Matrix, y_true: &Targets) -> Result<Vec<f64>> {
        let y = y_true.values();
        batch_dims("BceLoss::forward", y_pred, &y)?;
        let clipped = y_pred.clip(CLIP_EPS, 1.0 - CLIP_EPS);
        Ok(clipped.data.iter().zip(y.data.iter())
            .map(|(p, t)| {
                p.iter().zip(t.iter())
                    .map(|(p, t)| -(t * p.ln() + (1.0 - t) * (1.0 - p).ln()))
                    .sum::<f64>() / p.len() as f64
            })
            .collect())
    }

    /// Gradient: `-(y / p - (1 - y) / (1 - p)) / outputs / samples` on clipped `p`.
    pub fn backward(dvalues: &Matrix, y_true: &Targets) -> Result<Matrix> {
        let y = y_true.values();
        let (samples, outputs) = batch_dims("BceLoss::backward", dvalues, &y)?;
        let norm = (samples * outputs) as f64;
        dvalues.clip(CLIP_EPS, 1.0 - CLIP_EPS)
            .zip_map(&y, |p, t| -(t / p - (1.0 - t) / (1.0 - p)) / norm)
    }
}
