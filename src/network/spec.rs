use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Deserialize};

use crate::accuracy::accuracy::Accuracy;
use crate::activation::activation::ActivationFunction;
use crate::error::{NnError, Result};
use crate::layers::dense::{Dense, Regularization};
use crate::layers::dropout::Dropout;
use crate::loss::loss_type::LossType;
use crate::network::model::Model;
use crate::optim::optimizer::{Optimizer, OptimizerSpec};

/// Describes one node in a model specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSpec {
    Dense {
        n_inputs: usize,
        n_neurons: usize,
        #[serde(default)]
        regularization: Regularization,
    },
    Dropout {
        rate: f64,
    },
    Activation {
        function: ActivationFunction,
    },
}

/// A fully serializable description of a model architecture plus its loss,
/// optimizer and accuracy metric.
///
/// A spec holds no parameter values: `build` draws fresh weights every time
/// (reproducibly when `seed` is set).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    /// Human-readable name of the setup.
    pub name: String,
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    pub loss: LossType,
    pub optimizer: OptimizerSpec,
    pub accuracy: Accuracy,
    /// Seed for weight initialization and dropout masks.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ModelSpec {
    /// Builds and finalizes a model.
    ///
    /// Fails with `ShapeMismatch` when a dense layer's `n_inputs` differs
    /// from the previous dense layer's `n_neurons`.
    pub fn build(&self) -> Result<Model> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut model = Model::new();
        let mut width: Option<usize> = None;
        for layer in &self.layers {
            match layer {
                LayerSpec::Dense { n_inputs, n_neurons, regularization } => {
                    if let Some(prev) = width.filter(|&w| w != *n_inputs) {
                        return Err(NnError::shape(
                            format!("layer spec in '{}'", self.name),
                            (prev, *n_neurons),
                            (*n_inputs, *n_neurons),
                        ));
                    }
                    width = Some(*n_neurons);
                    model.add(Dense::with_rng(*n_inputs, *n_neurons, &mut rng).with_regularization(*regularization));
                }
                LayerSpec::Dropout { rate } => {
                    model.add(Dropout::with_seed(*rate, rng.gen())?);
                }
                LayerSpec::Activation { function } => {
                    model.add(*function);
                }
            }
        }

        model.set(self.loss, Optimizer::from_spec(&self.optimizer), self.accuracy);
        model.finalize()?;
        Ok(model)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a `ModelSpec` from a JSON file.
    pub fn load_json(path: &str) -> Result<ModelSpec> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
