use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;

/// Adaptive state an optimizer keeps for one trainable layer.
///
/// Every tensor starts absent and is zero-filled (shaped like the parameter
/// it tracks) the first time an update rule asks for it. Once present it is
/// mutated in place for the rest of training.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamState {
    pub weight_momentums: Option<Matrix>,
    pub weight_cache: Option<Matrix>,
    pub bias_momentums: Option<Matrix>,
    pub bias_cache: Option<Matrix>,
}

impl ParamState {
    /// `(weight_momentums, bias_momentums)`, allocated on first use.
    pub(crate) fn momentums(&mut self, layer: &Dense) -> (&mut Matrix, &mut Matrix) {
        (
            self.weight_momentums.get_or_insert_with(|| zeros_like(&layer.weights)),
            self.bias_momentums.get_or_insert_with(|| zeros_like(&layer.biases)),
        )
    }

    /// `(weight_cache, bias_cache)`, allocated on first use.
    pub(crate) fn cache(&mut self, layer: &Dense) -> (&mut Matrix, &mut Matrix) {
        (
            self.weight_cache.get_or_insert_with(|| zeros_like(&layer.weights)),
            self.bias_cache.get_or_insert_with(|| zeros_like(&layer.biases)),
        )
    }
}

/// All four Adam buffers, borrowed at once.
pub(crate) struct Moments<'a> {
    pub weight_momentums: &'a mut Matrix,
    pub weight_cache: &'a mut Matrix,
    pub bias_momentums: &'a mut Matrix,
    pub bias_cache: &'a mut Matrix,
}

impl ParamState {
    pub(crate) fn moments(&mut self, layer: &Dense) -> Moments<'_> {
        Moments {
            weight_momentums: self.weight_momentums.get_or_insert_with(|| zeros_like(&layer.weights)),
            weight_cache: self.weight_cache.get_or_insert_with(|| zeros_like(&layer.weights)),
            bias_momentums: self.bias_momentums.get_or_insert_with(|| zeros_like(&layer.biases)),
            bias_cache: self.bias_cache.get_or_insert_with(|| zeros_like(&layer.biases)),
        }
    }
}

fn zeros_like(m: &Matrix) -> Matrix {
    Matrix::zeros(m.rows, m.cols)
}
