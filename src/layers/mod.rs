pub mod dense;
pub mod dropout;
pub mod input;
pub mod layer;

pub use dense::{Dense, Regularization};
pub use dropout::Dropout;
pub use input::InputLayer;
pub use layer::Layer;
