use std::sync::mpsc;

use crate::error::{NnError, Result};
use crate::train::epoch_stats::EpochStats;

/// Configuration for a `Model::train` run.
///
/// # Fields
/// - `epochs`: number of full-batch optimization steps
/// - `print_every`: report progress every this many epochs (must be ≥ 1)
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                   report. A dropped receiver does not stop training.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub print_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` with no progress channel.
    pub fn new(epochs: usize, print_every: usize) -> Self {
        TrainConfig {
            epochs,
            print_every,
            progress_tx: None,
        }
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.print_every == 0 {
            return Err(NnError::InvalidInput("print_every must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig::new(1, 1)
    }
}
