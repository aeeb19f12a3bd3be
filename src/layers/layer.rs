use crate::activation::activation::{Activation, ActivationFunction};
use crate::error::Result;
use crate::layers::dense::Dense;
use crate::layers::dropout::Dropout;
use crate::math::matrix::Matrix;
use crate::math::targets::Predictions;

/// One node of a model's layer stack.
///
/// Every node consumes the previous node's `output` on the way forward and
/// the next node's `dinputs` on the way back. Only `Dense` carries trainable
/// parameters.
#[derive(Debug, Clone)]
pub enum Layer {
    Dense(Dense),
    Dropout(Dropout),
    Activation(Activation),
}

impl Layer {
    pub fn forward(&mut self, inputs: &Matrix, training: bool) -> Result<()> {
        match self {
            Layer::Dense(dense) => dense.forward(inputs),
            Layer::Dropout(dropout) => dropout.forward(inputs, training),
            Layer::Activation(activation) => {
                activation.forward(inputs);
                Ok(())
            }
        }
    }

    pub fn backward(&mut self, dvalues: &Matrix) -> Result<()> {
        match self {
            Layer::Dense(dense) => dense.backward(dvalues),
            Layer::Dropout(dropout) => dropout.backward(dvalues),
            Layer::Activation(activation) => activation.backward(dvalues),
        }
    }

    pub fn output(&self) -> &Matrix {
        match self {
            Layer::Dense(dense) => &dense.output,
            Layer::Dropout(dropout) => &dropout.output,
            Layer::Activation(activation) => &activation.output,
        }
    }

    pub fn dinputs(&self) -> &Matrix {
        match self {
            Layer::Dense(dense) => &dense.dinputs,
            Layer::Dropout(dropout) => &dropout.dinputs,
            Layer::Activation(activation) => &activation.dinputs,
        }
    }

    /// Decodes outputs when this node is the last one in the model.
    /// Non-activation nodes report their raw values.
    pub fn predictions(&self, outputs: &Matrix) -> Predictions {
        match self {
            Layer::Activation(activation) => activation.predictions(outputs),
            _ => Predictions::Values(outputs.clone()),
        }
    }

    pub fn as_dense(&self) -> Option<&Dense> {
        match self {
            Layer::Dense(dense) => Some(dense),
            _ => None,
        }
    }

    pub fn as_dense_mut(&mut self) -> Option<&mut Dense> {
        match self {
            Layer::Dense(dense) => Some(dense),
            _ => None,
        }
    }

    pub fn is_trainable(&self) -> bool {
        matches!(self, Layer::Dense(_))
    }

    pub fn activation_function(&self) -> Option<ActivationFunction> {
        match self {
            Layer::Activation(activation) => Some(activation.function),
            _ => None,
        }
    }
}

impl From<Dense> for Layer {
    fn from(dense: Dense) -> Self {
        Layer::Dense(dense)
    }
}

impl From<Dropout> for Layer {
    fn from(dropout: Dropout) -> Self {
        Layer::Dropout(dropout)
    }
}

impl From<Activation> for Layer {
    fn from(activation: Activation) -> Self {
        Layer::Activation(activation)
    }
}

impl From<ActivationFunction> for Layer {
    fn from(function: ActivationFunction) -> Self {
        Layer::Activation(Activation::new(function))
    }
}
