use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;
use crate::optim::optimizer::default_epsilon;
use crate::optim::state::ParamState;

/// Adam: exponential moving averages of the gradient (momentum, `beta_1`)
/// and of its square (cache, `beta_2`), both bias-corrected.
///
/// ```text
/// m = β1·m + (1-β1)·g          m̂ = m / (1 - β1^(t+1))
/// v = β2·v + (1-β2)·g²         v̂ = v / (1 - β2^(t+1))
/// p -= lr · m̂ / (√v̂ + ε)
/// ```
///
/// `t` is the optimizer's iteration count, which is 0 on the first step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Adam {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_beta_1")]
    pub beta_1: f64,
    #[serde(default = "default_beta_2")]
    pub beta_2: f64,
}

fn default_beta_1() -> f64 {
    0.9
}

fn default_beta_2() -> f64 {
    0.999
}

impl Default for Adam {
    fn default() -> Self {
        Adam {
            epsilon: default_epsilon(),
            beta_1: default_beta_1(),
            beta_2: default_beta_2(),
        }
    }
}

impl Adam {
    pub fn new(beta_1: f64, beta_2: f64) -> Adam {
        Adam { beta_1, beta_2, ..Adam::default() }
    }

    pub fn update(&self, lr: f64, iterations: usize, state: &mut ParamState, layer: &mut Dense) -> Result<()> {
        let t = iterations as i32 + 1;
        let corrections = (1.0 - self.beta_1.powi(t), 1.0 - self.beta_2.powi(t));

        let moments = state.moments(layer);
        self.step(lr, moments.weight_momentums, moments.weight_cache, &layer.dweights, &mut layer.weights, corrections)?;
        self.step(lr, moments.bias_momentums, moments.bias_cache, &layer.dbiases, &mut layer.biases, corrections)?;
        Ok(())
    }

    fn step(
        &self,
        lr: f64,
        momentums: &mut Matrix,
        cache: &mut Matrix,
        grad: &Matrix,
        params: &mut Matrix,
        (momentum_correction, cache_correction): (f64, f64),
    ) -> Result<()> {
        let (b1, b2, eps) = (self.beta_1, self.beta_2, self.epsilon);
        momentums.zip_apply(grad, |m, g| *m = b1 * *m + (1.0 - b1) * g)?;
        cache.zip_apply(grad, |c, g| *c = b2 * *c + (1.0 - b2) * g * g)?;

        let update = momentums.zip_map(cache, |m, c| {
            let m_hat = m / momentum_correction;
            let v_hat = c / cache_correction;
            -lr * m_hat / (v_hat.sqrt() + eps)
        })?;
        params.zip_apply(&update, |p, u| *p += u)
    }
}
