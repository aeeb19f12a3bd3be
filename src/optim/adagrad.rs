use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::optim::optimizer::default_epsilon;
use crate::optim::state::ParamState;

/// Adagrad: the cache accumulates squared gradients for the whole run, so
/// frequently-updated parameters take ever smaller steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adagrad {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

impl Default for Adagrad {
    fn default() -> Self {
        Adagrad { epsilon: default_epsilon() }
    }
}

impl Adagrad {
    pub fn update(&self, lr: f64, state: &mut ParamState, layer: &mut Dense) -> Result<()> {
        let eps = self.epsilon;
        let (weight_cache, bias_cache) = state.cache(layer);
        weight_cache.zip_apply(&layer.dweights, |c, g| *c += g * g)?;
        bias_cache.zip_apply(&layer.dbiases, |c, g| *c += g * g)?;

        let weight_step = layer.dweights.zip_map(weight_cache, |g, c| -lr * g / (c.sqrt() + eps))?;
        let bias_step = layer.dbiases.zip_map(bias_cache, |g, c| -lr * g / (c.sqrt() + eps))?;
        layer.weights.zip_apply(&weight_step, |p, s| *p += s)?;
        layer.biases.zip_apply(&bias_step, |p, s| *p += s)?;
        Ok(())
    }
}
