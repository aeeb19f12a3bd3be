use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::math::targets::Targets;

/// Combined Softmax activation + categorical cross-entropy backward step.
///
/// When the two are composed the gradient w.r.t. the softmax inputs
/// collapses to `(predicted - one_hot_true) / samples`, so the per-sample
/// Jacobian never has to be built. There is no forward: the Softmax node's
/// own output is what gets passed in as `dvalues`.
#[derive(Debug, Clone, Default)]
pub struct SoftmaxCrossEntropy {
    pub dinputs: Matrix,
}

impl SoftmaxCrossEntropy {
    pub fn new() -> SoftmaxCrossEntropy {
        SoftmaxCrossEntropy::default()
    }

    pub fn backward(&mut self, dvalues: &Matrix, y_true: &Targets) -> Result<()> {
        let samples = dvalues.rows;
        if samples == 0 || dvalues.cols == 0 {
            return Err(NnError::InvalidInput("softmax/cross-entropy backward on an empty batch".into()));
        }
        if y_true.len() != samples {
            return Err(NnError::shape(
                "SoftmaxCrossEntropy::backward",
                (samples, dvalues.cols),
                (y_true.len(), dvalues.cols),
            ));
        }

        if let Targets::Dense(labels) = y_true {
            if labels.cols != dvalues.cols {
                return Err(NnError::shape("SoftmaxCrossEntropy::backward", dvalues.shape(), labels.shape()));
            }
        }

        let mut dinputs = dvalues.clone();
        for (row, class) in y_true.class_indices().into_iter().enumerate() {
            if class >= dvalues.cols {
                return Err(NnError::InvalidInput(format!(
                    "class index {class} out of range for {} classes",
                    dvalues.cols
                )));
            }
            dinputs.data[row][class] -= 1.0;
        }

        self.dinputs = dinputs.scale(1.0 / samples as f64);
        Ok(())
    }
}
