use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by the training loop.
///
/// One value is produced every `print_every` epochs. It is logged, sent on
/// the configured progress channel, and collected into the run's
/// `TrainReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Fraction of training samples predicted correctly, in [0, 1].
    pub accuracy: f64,
    /// `data_loss + regularization_loss`.
    pub loss: f64,
    pub data_loss: f64,
    pub regularization_loss: f64,
    /// Learning rate used for this epoch's update (after decay).
    pub learning_rate: f64,
    /// Wall-clock duration of this single epoch in milliseconds.
    pub elapsed_ms: u64,
}

/// Result of a forward-only pass over held-out data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationStats {
    pub accuracy: f64,
    /// Data loss only; regularization is not applied to validation.
    pub loss: f64,
}

/// Everything a `train` call reports back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    /// The reported epochs, in order.
    pub history: Vec<EpochStats>,
    pub validation: Option<ValidationStats>,
}

impl TrainReport {
    pub fn last(&self) -> Option<&EpochStats> {
        self.history.last()
    }
}
