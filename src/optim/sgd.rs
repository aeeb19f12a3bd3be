use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::optim::state::ParamState;

/// Stochastic gradient descent, optionally with momentum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sgd {
    #[serde(default)]
    pub momentum: f64,
}

impl Sgd {
    pub fn new(momentum: f64) -> Sgd {
        Sgd { momentum }
    }

    /// Without momentum: `p -= lr * g`.
    /// With momentum: `v = momentum * v - lr * g; p += v`, `v` kept for the next step.
    pub fn update(&self, lr: f64, state: &mut ParamState, layer: &mut Dense) -> Result<()> {
        if self.momentum != 0.0 {
            let momentum = self.momentum;
            let (weight_momentums, bias_momentums) = state.momentums(layer);
            weight_momentums.zip_apply(&layer.dweights, |v, g| *v = momentum * *v - lr * g)?;
            bias_momentums.zip_apply(&layer.dbiases, |v, g| *v = momentum * *v - lr * g)?;
            layer.weights.zip_apply(weight_momentums, |p, v| *p += v)?;
            layer.biases.zip_apply(bias_momentums, |p, v| *p += v)?;
        } else {
            layer.weights.zip_apply(&layer.dweights, |p, g| *p -= lr * g)?;
            layer.biases.zip_apply(&layer.dbiases, |p, g| *p -= lr * g)?;
        }
        Ok(())
    }
}
