pub mod adagrad;
pub mod adam;
pub mod optimizer;
pub mod rmsprop;
pub mod sgd;
pub mod state;

pub use adagrad::Adagrad;
pub use adam::Adam;
pub use optimizer::{Optimizer, OptimizerKind, OptimizerSpec};
pub use rmsprop::RmsProp;
pub use sgd::Sgd;
pub use state::ParamState;
