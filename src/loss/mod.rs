pub mod bce;
pub mod cross_entropy;
pub mod loss_type;
pub mod mae;
pub mod mse;
pub mod regularization;

pub use bce::BceLoss;
pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::{LossType, LossValue};
pub use mae::MaeLoss;
pub use mse::MseLoss;
pub use regularization::regularization_loss;
