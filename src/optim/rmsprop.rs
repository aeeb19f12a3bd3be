use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::optim::optimizer::default_epsilon;
use crate::optim::state::ParamState;

/// RMSprop: like Adagrad, but the cache is an exponential moving average
/// `cache = rho * cache + (1 - rho) * g²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RmsProp {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_rho")]
    pub rho: f64,
}

fn default_rho() -> f64 {
    0.9
}

impl Default for RmsProp {
    fn default() -> Self {
        RmsProp { epsilon: default_epsilon(), rho: default_rho() }
    }
}

impl RmsProp {
    pub fn new(rho: f64) -> RmsProp {
        RmsProp { rho, ..RmsProp::default() }
    }

    pub fn update(&self, lr: f64, state: &mut ParamState, layer: &mut Dense) -> Result<()> {
        let (eps, rho) = (self.epsilon, self.rho);
        let (weight_cache, bias_cache) = state.cache(layer);
        weight_cache.zip_apply(&layer.dweights, |c, g| *c = rho * *c + (1.0 - rho) * g * g)?;
        bias_cache.zip_apply(&layer.dbiases, |c, g| *c = rho * *c + (1.0 - rho) * g * g)?;

        let weight_step = layer.dweights.zip_map(weight_cache, |g, c| -lr * g / (c.sqrt() + eps))?;
        let bias_step = layer.dbiases.zip_map(bias_cache, |g, c| -lr * g / (c.sqrt() + eps))?;
        layer.weights.zip_apply(&weight_step, |p, s| *p += s)?;
        layer.biases.zip_apply(&bias_step, |p, s| *p += s)?;
        Ok(())
    }
}
