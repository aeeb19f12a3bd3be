//! Error types for the training engine.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NnError>;

/// Errors surfaced by layers, losses, optimizers and the model.
#[derive(Error, Debug)]
pub enum NnError {
    /// Two tensors (or a tensor and a label set) disagree on shape.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// An operation was called out of order (e.g. `train` before `finalize`).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Degenerate or out-of-range input (empty batch, bad dropout rate, ...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NnError {
    pub(crate) fn shape(
        context: impl Into<String>,
        expected: (usize, usize),
        actual: (usize, usize),
    ) -> NnError {
        NnError::ShapeMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
