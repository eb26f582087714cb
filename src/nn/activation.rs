use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    ReLU,
    Sigmoid,
    Identity,
    /// Softmax is vector-valued and applied at the layer level in
    /// `Layer::forward()`; the element-wise `apply()` must not be reached
    /// for this variant.
    Softmax,
}

impl Activation {
    /// Element-wise activation. For `Softmax` use `softmax()` on the whole
    /// pre-activation vector instead.
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::ReLU => {
                if x > 0.0 {
                    x
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Identity => x,
            Activation::Softmax => {
                panic!("Activation::Softmax is vector-valued; Layer::forward() applies it")
            }
        }
    }

    /// Element-wise derivative evaluated at pre-activation `x`.
    ///
    /// Softmax returns 1.0: it is always paired with cross-entropy, whose
    /// derivative already yields the combined gradient (predicted - expected)
    /// with respect to the logits, so the layer must pass the delta through
    /// unchanged.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            Activation::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::Sigmoid => {
                let fx = self.apply(x);
                fx * (1.0 - fx)
            }
            Activation::Identity => 1.0,
            Activation::Softmax => 1.0,
        }
    }
}

/// Numerically stable softmax over a full pre-activation vector.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn softmax_sums_to_one() {
        let p = softmax(&[1.0, 2.0, 3.0]);
        let sum: f64 = p.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(p[2] > p[1] && p[1] > p[0]);
    }

    #[test]
    fn softmax_is_shift_invariant() {
        let a = softmax(&[1.0, 2.0, 3.0]);
        let b = softmax(&[1001.0, 1002.0, 1003.0]);
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn relu_derivative_gates_on_sign() {
        assert_eq!(Activation::ReLU.derivative(2.0), 1.0);
        assert_eq!(Activation::ReLU.derivative(-2.0), 0.0);
    }
}
