use tracing::debug;

use crate::accuracy::accuracy::Accuracy;
use crate::activation::activation::ActivationFunction;
use crate::activation::softmax_cce::SoftmaxCrossEntropy;
use crate::error::{NnError, Result};
use crate::layers::dense::Dense;
use crate::layers::input::InputLayer;
use crate::layers::layer::Layer;
use crate::loss::loss_type::{LossType, LossValue};
use crate::math::matrix::Matrix;
use crate::math::targets::{Predictions, Targets};
use crate::optim::optimizer::Optimizer;
use crate::train::epoch_stats::{TrainReport, ValidationStats};
use crate::train::loop_fn::train_loop;
use crate::train::train_config::TrainConfig;

/// An ordered stack of layers trained against one loss with one optimizer.
///
/// Build it with [`Model::add`] and [`Model::set`], then call
/// [`Model::finalize`] once before training. Forward traversal runs the
/// layers in insertion order; backward runs them in reverse.
#[derive(Debug, Clone, Default)]
pub struct Model {
    layers: Vec<Layer>,
    input_layer: InputLayer,
    loss: Option<LossType>,
    pub(crate) optimizer: Option<Optimizer>,
    pub(crate) accuracy: Option<Accuracy>,
    /// Indices into `layers` of the nodes with parameters, in forward order.
    trainable_layers: Vec<usize>,
    softmax_classifier_output: Option<SoftmaxCrossEntropy>,
    finalized: bool,
}

impl Model {
    pub fn new() -> Model {
        Model::default()
    }

    /// Appends a layer. A finalized model must be finalized again afterwards.
    pub fn add(&mut self, layer: impl Into<Layer>) -> &mut Self {
        self.layers.push(layer.into());
        self.finalized = false;
        self
    }

    pub fn set(&mut self, loss: LossType, optimizer: Optimizer, accuracy: Accuracy) -> &mut Self {
        self.loss = Some(loss);
        self.optimizer = Some(optimizer);
        self.accuracy = Some(accuracy);
        self.finalized = false;
        self
    }

    /// Caches the trainable layers and decides whether the fused
    /// softmax/cross-entropy gradient applies.
    pub fn finalize(&mut self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(NnError::InvalidState("cannot finalize a model without layers".into()));
        }
        let loss = self.loss.ok_or_else(|| NnError::InvalidState("loss not set".into()))?;
        if self.optimizer.is_none() || self.accuracy.is_none() {
            return Err(NnError::InvalidState("optimizer and accuracy must be set before finalize".into()));
        }

        self.trainable_layers = self.layers.iter()
            .enumerate()
            .filter(|(_, layer)| layer.is_trainable())
            .map(|(i, _)| i)
            .collect();

        let softmax_output = self.layers.last()
            .and_then(Layer::activation_function)
            == Some(ActivationFunction::Softmax);
        self.softmax_classifier_output = (softmax_output && loss == LossType::CategoricalCrossentropy)
            .then(SoftmaxCrossEntropy::new);

        self.finalized = true;
        debug!(
            layers = self.layers.len(),
            trainable = self.trainable_layers.len(),
            fused_softmax_loss = self.softmax_classifier_output.is_some(),
            "model finalized"
        );
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Trains on `(x, y)`; see [`train_loop`].
    pub fn train(
        &mut self,
        x: &Matrix,
        y: &Targets,
        config: &TrainConfig,
        validation: Option<(&Matrix, &Targets)>,
    ) -> Result<TrainReport> {
        train_loop(self, x, y, validation, config)
    }

    /// Runs `x` through every layer and returns the last layer's output.
    ///
    /// Fails with `InvalidState` unless the model is finalized.
    pub fn forward(&mut self, x: &Matrix, training: bool) -> Result<Matrix> {
        self.ensure_ready()?;
        self.input_layer.forward(x);
        for i in 0..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            let inputs = match done.last() {
                Some(prev) => prev.output(),
                None => &self.input_layer.output,
            };
            rest[0].forward(inputs, training)?;
        }
        Ok(self.layers.last().map(|layer| layer.output().clone()).unwrap_or_default())
    }

    /// Backpropagates from the loss through every layer, leaving `dweights`,
    /// `dbiases` and `dinputs` set on each node.
    pub fn backward(&mut self, output: &Matrix, y: &Targets) -> Result<()> {
        self.ensure_ready()?;
        let loss = self.loss.ok_or_else(|| NnError::InvalidState("loss not set".into()))?;
        let n = self.layers.len();

        let (upstream, top) = match self.softmax_classifier_output.as_mut() {
            Some(fused) => {
                fused.backward(output, y)?;
                let grad = fused.dinputs.clone();
                // The softmax node takes its gradient straight from the fused step.
                if let Some(Layer::Activation(softmax)) = self.layers.last_mut() {
                    softmax.dinputs = grad.clone();
                }
                (grad, n - 1)
            }
            None => (loss.backward(output, y)?, n),
        };

        for i in (0..top).rev() {
            let (head, tail) = self.layers.split_at_mut(i + 1);
            let dvalues = if i + 1 == top { &upstream } else { tail[0].dinputs() };
            head[i].backward(dvalues)?;
        }
        Ok(())
    }

    /// Data loss (and optionally the regularization penalty) of `output`.
    pub fn loss_value(&self, output: &Matrix, y: &Targets, include_regularization: bool) -> Result<LossValue> {
        let loss = self.loss.ok_or_else(|| NnError::InvalidState("loss not set".into()))?;
        loss.calculate(output, y, self.trainable_layers(), include_regularization)
    }

    /// Decodes `outputs` with the last layer's `predictions`.
    pub fn output_predictions(&self, outputs: &Matrix) -> Predictions {
        match self.layers.last() {
            Some(layer) => layer.predictions(outputs),
            None => Predictions::Values(outputs.clone()),
        }
    }

    /// One optimization step over every trainable layer.
    ///
    /// All gradients are shape-checked first so a failure leaves every
    /// parameter untouched.
    pub(crate) fn optimize(&mut self) -> Result<()> {
        for layer in self.trainable_layers() {
            layer.ensure_gradients()?;
        }
        let optimizer = self.optimizer.as_mut()
            .ok_or_else(|| NnError::InvalidState("optimizer not set".into()))?;

        optimizer.pre_update_params();
        for (slot, &index) in self.trainable_layers.iter().enumerate() {
            if let Some(dense) = self.layers[index].as_dense_mut() {
                optimizer.update_params(slot, dense)?;
            }
        }
        optimizer.post_update_params();
        Ok(())
    }

    /// Forward-only pass with loss and accuracy; no gradients, no updates.
    pub fn evaluate(&mut self, x: &Matrix, y: &Targets) -> Result<ValidationStats> {
        self.ensure_ready()?;
        self.check_batch(x, y)?;
        let output = self.forward(x, false)?;
        let loss = self.loss_value(&output, y, false)?;
        let predictions = self.output_predictions(&output);
        let accuracy = self.accuracy
            .as_mut()
            .ok_or_else(|| NnError::InvalidState("accuracy not set".into()))?
            .calculate(&predictions, y)?;
        Ok(ValidationStats { accuracy, loss: loss.data })
    }

    /// Inference-mode forward pass decoded by the output layer.
    pub fn predict(&mut self, x: &Matrix) -> Result<Predictions> {
        self.ensure_ready()?;
        self.check_inputs(x)?;
        let output = self.forward(x, false)?;
        Ok(self.output_predictions(&output))
    }

    pub(crate) fn ensure_ready(&self) -> Result<()> {
        if !self.finalized {
            return Err(NnError::InvalidState("model must be finalized before use".into()));
        }
        Ok(())
    }

    /// Validates a batch before any computation touches it.
    pub(crate) fn check_batch(&self, x: &Matrix, y: &Targets) -> Result<()> {
        self.check_inputs(x)?;
        if y.len() != x.rows {
            return Err(NnError::shape("targets", (x.rows, 1), (y.len(), 1)));
        }
        Ok(())
    }

    fn check_inputs(&self, x: &Matrix) -> Result<()> {
        if x.is_empty() {
            return Err(NnError::InvalidInput(format!("empty input batch {:?}", x.shape())));
        }
        if let Some(first) = self.layers.iter().find_map(Layer::as_dense) {
            if first.n_inputs() != x.cols {
                return Err(NnError::shape("model inputs", (x.rows, first.n_inputs()), x.shape()));
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// The layers with parameters, in forward order.
    pub fn trainable_layers(&self) -> impl Iterator<Item = &Dense> + '_ {
        self.trainable_layers.iter().filter_map(|&i| self.layers[i].as_dense())
    }

    pub fn loss(&self) -> Option<LossType> {
        self.loss
    }

    pub fn optimizer(&self) -> Option<&Optimizer> {
        self.optimizer.as_ref()
    }

    pub fn accuracy(&self) -> Option<&Accuracy> {
        self.accuracy.as_ref()
    }

    pub fn uses_fused_softmax_loss(&self) -> bool {
        self.softmax_classifier_output.is_some()
    }
}
