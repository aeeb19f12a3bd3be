use std::time::Instant;

use tracing::{debug, info, warn};

use crate::accuracy::accuracy::Accuracy;
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;
use crate::network::model::Model;
use crate::train::epoch_stats::{EpochStats, TrainReport};
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `model` on the full batch `(x, y)` for `config.epochs` epochs.
///
/// Each epoch runs: forward → loss + regularization + accuracy → backward →
/// one optimizer step over every trainable layer. Every `print_every`
/// epochs an `EpochStats` is logged, sent on `config.progress_tx` and kept
/// in the returned report. When `validation` is given, one forward-only
/// pass over it runs after the last epoch.
///
/// # Errors
/// - `InvalidState` if the model has not been finalized.
/// - `InvalidInput` for an empty batch or `print_every == 0`.
/// - `ShapeMismatch` if `y` does not have one entry per row of `x`, or the
///   first dense layer expects a different feature count.
///
/// All of these are checked before the first epoch. An error inside an
/// epoch aborts the run before that epoch's parameter update.
pub fn train_loop(
    model: &mut Model,
    x: &Matrix,
    y: &Targets,
    validation: Option<(&Matrix, &Targets)>,
    config: &TrainConfig,
) -> Result<TrainReport> {
    model.ensure_ready()?;
    config.validate()?;
    model.check_batch(x, y)?;
    if let Some((x_val, y_val)) = validation {
        model.check_batch(x_val, y_val)?;
    }
    accuracy_mut(model)?.init(y, false)?;

    let mut history = Vec::new();

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        // ── Forward, loss and accuracy ────────────────────────────────────
        let output = model.forward(x, true)?;
        let loss = model.loss_value(&output, y, true)?;
        let predictions = model.output_predictions(&output);
        let accuracy = accuracy_mut(model)?.calculate(&predictions, y)?;

        // ── Backward and update ───────────────────────────────────────────
        model.backward(&output, y)?;
        model.optimize()?;

        if !loss.total().is_finite() {
            warn!(epoch, data_loss = loss.data, regularization_loss = loss.regularization, "non-finite loss");
        }

        if epoch % config.print_every != 0 {
            continue;
        }

        let learning_rate = model.optimizer().map_or(0.0, |opt| opt.current_learning_rate);
        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            accuracy,
            loss: loss.total(),
            data_loss: loss.data,
            regularization_loss: loss.regularization,
            learning_rate,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };

        info!(
            epoch,
            acc = stats.accuracy,
            loss = stats.loss,
            data_loss = stats.data_loss,
            reg_loss = stats.regularization_loss,
            lr = stats.learning_rate,
            "training"
        );

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats.clone()).is_err() {
                debug!(epoch, "progress receiver dropped");
            }
        }
        history.push(stats);
    }

    let validation = match validation {
        Some((x_val, y_val)) => {
            let stats = model.evaluate(x_val, y_val)?;
            info!(
                acc = stats.accuracy,
                loss = stats.loss,
                "validation"
            );
            Some(stats)
        }
        None => None,
    };

    Ok(TrainReport { history, validation })
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn accuracy_mut(model: &mut Model) -> Result<&mut Accuracy> {
    model.accuracy
        .as_mut()
        .ok_or_else(|| NnError::InvalidState("accuracy not set".into()))
}
