pub mod matrix;
pub mod targets;

pub use matrix::Matrix;
pub use targets::{Predictions, Targets};
