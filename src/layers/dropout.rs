use rand::distributions::{Bernoulli, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;

/// Inverted dropout.
///
/// In training mode each activation survives with probability `keep_rate`
/// and survivors are scaled by `1 / keep_rate`, so inference can be a plain copy.
#[derive(Debug, Clone)]
pub struct Dropout {
    keep_rate: f64,
    mask: Option<Matrix>,
    rng: StdRng,
    pub output: Matrix,
    pub dinputs: Matrix,
}

impl Dropout {
    /// `rate` is the fraction of units dropped and must lie in `[0, 1)`.
    pub fn new(rate: f64) -> Result<Dropout> {
        Dropout::build(rate, StdRng::from_entropy())
    }

    pub fn with_seed(rate: f64, seed: u64) -> Result<Dropout> {
        Dropout::build(rate, StdRng::seed_from_u64(seed))
    }

    fn build(rate: f64, rng: StdRng) -> Result<Dropout> {
        if !(0.0..1.0).contains(&rate) {
            return Err(NnError::InvalidInput(format!("dropout rate {rate} outside [0, 1)")));
        }
        Ok(Dropout {
            keep_rate: 1.0 - rate,
            mask: None,
            rng,
            output: Matrix::default(),
            dinputs: Matrix::default(),
        })
    }

    pub fn rate(&self) -> f64 {
        1.0 - self.keep_rate
    }

    pub fn forward(&mut self, inputs: &Matrix, training: bool) -> Result<()> {
        if !training {
            self.output = inputs.clone();
            self.mask = None;
            return Ok(());
        }

        let keep = Bernoulli::new(self.keep_rate)
            .map_err(|e| NnError::InvalidInput(format!("dropout keep rate: {e}")))?;
        let scale = 1.0 / self.keep_rate;
        let data = (0..inputs.rows)
            .map(|_| {
                (0..inputs.cols)
                    .map(|_| if keep.sample(&mut self.rng) { scale } else { 0.0 })
                    .collect()
            })
            .collect();
        let mask = Matrix { rows: inputs.rows, cols: inputs.cols, data };

        self.output = inputs.zip_map(&mask, |x, m| x * m)?;
        self.mask = Some(mask);
        Ok(())
    }

    pub fn backward(&mut self, dvalues: &Matrix) -> Result<()> {
        let mask = self.mask.as_ref().ok_or_else(|| {
            NnError::InvalidState("dropout backward called without a training-mode forward".into())
        })?;
        self.dinputs = dvalues.zip_map(mask, |d, m| d * m)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch() -> Matrix {
        Matrix::from_data(vec![vec![1.0, -2.0, 3.0], vec![0.5, 4.0, -1.5]]).unwrap()
    }

    #[test]
    fn inference_is_identity_for_any_rate() {
        for rate in [0.0, 0.3, 0.9] {
            let mut dropout = Dropout::with_seed(rate, 1).unwrap();
            dropout.forward(&batch(), false).unwrap();
            assert_eq!(dropout.output, batch());
        }
    }

    #[test]
    fn zero_rate_keeps_everything_in_training() {
        let mut dropout = Dropout::with_seed(0.0, 3).unwrap();
        dropout.forward(&batch(), true).unwrap();
        assert_eq!(dropout.output, batch());
    }

    #[test]
    fn survivors_are_rescaled_and_gradient_uses_mask() {
        let mut dropout = Dropout::with_seed(0.5, 11).unwrap();
        let inputs = Matrix::filled(20, 20, 1.0);
        dropout.forward(&inputs, true).unwrap();
        assert!(dropout.output.iter().all(|&x| x == 0.0 || x == 2.0));

        dropout.backward(&Matrix::filled(20, 20, 3.0)).unwrap();
        for (d, o) in dropout.dinputs.iter().zip(dropout.output.iter()) {
            assert_eq!(*d, 3.0 * o);
        }
    }

    #[test]
    fn rate_outside_range_is_rejected() {
        assert!(Dropout::new(1.0).is_err());
        assert!(Dropout::new(-0.1).is_err());
    }

    #[test]
    fn backward_without_training_forward_fails() {
        let mut dropout = Dropout::with_seed(0.2, 5).unwrap();
        dropout.forward(&batch(), false).unwrap();
        assert!(matches!(dropout.backward(&batch()), Err(NnError::InvalidState(_))));
    }
}
