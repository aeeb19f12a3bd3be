use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::Result;
use crate::layers::dense::Dense;
use crate::optim::adagrad::Adagrad;
use crate::optim::adam::Adam;
use crate::optim::rmsprop::RmsProp;
use crate::optim::sgd::Sgd;
use crate::optim::state::ParamState;

pub(crate) fn default_epsilon() -> f64 {
    1e-7
}

/// Update rule plus its rule-specific hyperparameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptimizerKind {
    Sgd(Sgd),
    Adagrad(Adagrad),
    RmsProp(RmsProp),
    Adam(Adam),
}

impl OptimizerKind {
    /// Base learning rate used when none is given.
    pub fn default_learning_rate(&self) -> f64 {
        match self {
            OptimizerKind::Sgd(_) | OptimizerKind::Adagrad(_) => 1.0,
            OptimizerKind::RmsProp(_) | OptimizerKind::Adam(_) => 0.001,
        }
    }
}

/// Serializable optimizer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizerSpec {
    pub kind: OptimizerKind,
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub decay: f64,
}

/// Gradient-based optimizer with inverse-time learning-rate decay.
///
/// One optimization step is always
/// `pre_update_params` → `update_params` for every trainable layer →
/// `post_update_params`.
///
/// Per-layer adaptive state is kept in an arena indexed by the layer's
/// trainable slot (its position among the model's trainable layers).
#[derive(Debug, Clone)]
pub struct Optimizer {
    pub kind: OptimizerKind,
    pub learning_rate: f64,
    pub current_learning_rate: f64,
    pub decay: f64,
    pub iterations: usize,
    states: Vec<ParamState>,
}

impl Optimizer {
    pub fn new(kind: OptimizerKind, learning_rate: f64) -> Optimizer {
        Optimizer {
            kind,
            learning_rate,
            current_learning_rate: learning_rate,
            decay: 0.0,
            iterations: 0,
            states: Vec::new(),
        }
    }

    pub fn sgd(learning_rate: f64, momentum: f64) -> Optimizer {
        Optimizer::new(OptimizerKind::Sgd(Sgd::new(momentum)), learning_rate)
    }

    pub fn adagrad(learning_rate: f64) -> Optimizer {
        Optimizer::new(OptimizerKind::Adagrad(Adagrad::default()), learning_rate)
    }

    pub fn rms_prop(learning_rate: f64, rho: f64) -> Optimizer {
        Optimizer::new(OptimizerKind::RmsProp(RmsProp::new(rho)), learning_rate)
    }

    pub fn adam(learning_rate: f64, beta_1: f64, beta_2: f64) -> Optimizer {
        Optimizer::new(OptimizerKind::Adam(Adam::new(beta_1, beta_2)), learning_rate)
    }

    pub fn with_decay(mut self, decay: f64) -> Optimizer {
        self.decay = decay;
        self
    }

    pub fn from_spec(spec: &OptimizerSpec) -> Optimizer {
        let learning_rate = spec.learning_rate.unwrap_or_else(|| spec.kind.default_learning_rate());
        Optimizer::new(spec.kind, learning_rate).with_decay(spec.decay)
    }

    /// `current_lr = lr / (1 + decay * iterations)`; untouched when decay is 0.
    pub fn pre_update_params(&mut self) {
        if self.decay != 0.0 {
            self.current_learning_rate =
                self.learning_rate * (1.0 / (1.0 + self.decay * self.iterations as f64));
        }
    }

    /// Applies the update rule to one trainable layer in place.
    ///
    /// Gradient shapes are checked before any tensor is touched.
    pub fn update_params(&mut self, slot: usize, layer: &mut Dense) -> Result<()> {
        layer.ensure_gradients()?;
        if slot >= self.states.len() {
            debug!(slot, "allocating optimizer state");
            self.states.resize_with(slot + 1, ParamState::default);
        }

        let lr = self.current_learning_rate;
        let state = &mut self.states[slot];
        match &self.kind {
            OptimizerKind::Sgd(rule) => rule.update(lr, state, layer),
            OptimizerKind::Adagrad(rule) => rule.update(lr, state, layer),
            OptimizerKind::RmsProp(rule) => rule.update(lr, state, layer),
            OptimizerKind::Adam(rule) => rule.update(lr, self.iterations, state, layer),
        }
    }

    /// Marks the end of one optimization step.
    pub fn post_update_params(&mut self) {
        self.iterations += 1;
    }

    /// Adaptive state of the layer in `slot`, if it has been updated yet.
    pub fn state(&self, slot: usize) -> Option<&ParamState> {
        self.states.get(slot)
    }

    /// Forgets all adaptive state and restarts the decay schedule.
    pub fn reset(&mut self) {
        self.states.clear();
        self.iterations = 0;
        self.current_learning_rate = self.learning_rate;
    }
}

impl From<OptimizerSpec> for Optimizer {
    fn from(spec: OptimizerSpec) -> Self {
        Optimizer::from_spec(&spec)
    }
}
