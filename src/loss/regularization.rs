use crate::layers::dense::Dense;
use crate::math::matrix::Matrix;

/// Summed L1/L2 penalty over every layer's weights and biases.
///
/// A term only contributes when its strength is greater than zero.
pub fn regularization_loss<'a, I>(layers: I) -> f64
where
    I: IntoIterator<Item = &'a Dense>,
{
    layers.into_iter()
        .map(|layer| {
            let reg = layer.regularization;
            penalty(&layer.weights, reg.weight_l1, reg.weight_l2)
                + penalty(&layer.biases, reg.bias_l1, reg.bias_l2)
        })
        .sum()
}

fn penalty(params: &Matrix, l1: f64, l2: f64) -> f64 {
    let mut total = 0.0;
    if l1 > 0.0 {
        total += l1 * params.iter().map(|p| p.abs()).sum::<f64>();
    }
    if l2 > 0.0 {
        total += l2 * params.iter().map(|p| p * p).sum::<f64>();
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::dense::Regularization;

    #[test]
    fn zero_strengths_contribute_nothing() {
        let dense = Dense::from_parameters(Matrix::filled(2, 2, 3.0), Matrix::filled(1, 2, 1.0)).unwrap();
        assert_eq!(regularization_loss([&dense]), 0.0);
    }

    #[test]
    fn sums_each_enabled_term() {
        let dense = Dense::from_parameters(
            Matrix::from_data(vec![vec![1.0, -2.0]]).unwrap(),
            Matrix::row_vector(vec![-1.0, 0.5]),
        )
        .unwrap()
        .with_regularization(Regularization { weight_l1: 0.5, weight_l2: 0.25, bias_l1: 0.0, bias_l2: 2.0 });
        // 0.5 * 3 + 0.25 * 5 + 2 * 1.25
        assert!((regularization_loss([&dense]) - 5.25).abs() < 1e-12);
    }
}
