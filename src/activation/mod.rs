pub mod activation;
pub mod softmax_cce;

pub use activation::{Activation, ActivationFunction};
pub use softmax_cce::SoftmaxCrossEntropy;
