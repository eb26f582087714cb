/// Categorical cross-entropy for use with a Softmax output layer.
pub struct CrossEntropyLoss;

/// Small epsilon inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// L = -sum(expected[i] * ln(predicted[i] + eps))
    ///
    /// `predicted` holds softmax probabilities, `expected` the one-hot target.
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Combined Softmax + cross-entropy gradient with respect to the logits:
    /// ∂L/∂z_i = predicted[i] - expected[i].
    ///
    /// This is the initial delta of the backward pass; the Softmax layer's
    /// own derivative is identity so the Jacobian is not applied twice.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted
            .iter()
            .zip(expected.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}

/// One-hot encodes `label` over `n_classes` outputs.
pub fn one_hot(label: usize, n_classes: usize) -> Vec<f64> {
    let mut v = vec![0.0; n_classes];
    v[label] = 1.0;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let loss = CrossEntropyLoss::loss(&[0.0, 1.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(loss.abs() < 1e-9);
    }

    #[test]
    fn derivative_is_predicted_minus_expected() {
        let d = CrossEntropyLoss::derivative(&[0.2, 0.5, 0.3], &[0.0, 1.0, 0.0]);
        assert_eq!(d, vec![0.2, -0.5, 0.3]);
    }

    #[test]
    fn one_hot_places_single_one() {
        assert_eq!(one_hot(2, 4), vec![0.0, 0.0, 1.0, 0.0]);
    }
}
