use crate::math::matrix::Matrix;

/// Head of the pipeline: holds the current input batch as its output.
#[derive(Debug, Clone, Default)]
pub struct InputLayer {
    pub output: Matrix,
}

impl InputLayer {
    pub fn forward(&mut self, inputs: &Matrix) {
        self.output = inputs.clone();
    }
}
