//! A from-scratch feed-forward neural network training engine.
//!
//! A [`Model`] is an ordered stack of [`Layer`]s (dense, dropout and
//! activation nodes) trained full-batch against a [`LossType`] with an
//! [`Optimizer`]. Every component derives its own local gradient by hand;
//! there is no autodiff and no computation graph.

pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod loss;
pub mod optim;
pub mod accuracy;
pub mod network;
pub mod train;

// Convenience re-exports
pub use error::{NnError, Result};
pub use math::matrix::Matrix;
pub use math::targets::{Predictions, Targets};
pub use activation::activation::{Activation, ActivationFunction};
pub use activation::softmax_cce::SoftmaxCrossEntropy;
pub use layers::{Dense, Dropout, Layer, Regularization};
pub use loss::loss_type::{LossType, LossValue};
pub use optim::optimizer::{Optimizer, OptimizerKind, OptimizerSpec};
pub use accuracy::accuracy::Accuracy;
pub use network::{Model, ModelSpec, LayerSpec};
pub use train::{EpochStats, TrainConfig, TrainReport, ValidationStats};
