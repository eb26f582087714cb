use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;
use crate::nn::activation::{softmax, Activation};

fn default_true() -> bool {
    true
}

/// Fully-connected layer with optional inverted dropout.
///
/// Weight shape is (input_size, size); biases have length `size`. The
/// `trainable` flag is how backbone freezing works: gradients still flow
/// *through* a frozen layer during backprop, but the optimizer never steps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub input_size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activation: Activation,
    #[serde(default = "default_true")]
    pub trainable: bool,
    /// Dropout probability applied to the activations in training mode;
    /// 0.0 disables dropout.
    #[serde(default)]
    pub dropout: f64,

    // Cached per-sample state from the last forward pass; never serialized.
    #[serde(skip)]
    pre_activations: Vec<f64>,
    #[serde(skip)]
    pub activations: Vec<f64>,
    #[serde(skip)]
    dropout_mask: Vec<f64>,
}

impl Layer {
    pub fn new(size: usize, input_size: usize, activation: Activation) -> Layer {
        let weights = match activation {
            Activation::ReLU => Matrix::he(input_size, size),
            _ => Matrix::xavier(input_size, size),
        };
        Layer {
            size,
            input_size,
            weights,
            biases: vec![0.0; size],
            activation,
            trainable: true,
            dropout: 0.0,
            pre_activations: Vec::new(),
            activations: Vec::new(),
            dropout_mask: Vec::new(),
        }
    }

    pub fn with_dropout(mut self, dropout: f64) -> Layer {
        assert!((0.0..1.0).contains(&dropout), "dropout must be in [0, 1)");
        self.dropout = dropout;
        self
    }

    /// Forward pass for one sample. In training mode an inverted-dropout mask
    /// is sampled and folded into the activations; in inference mode the
    /// output is deterministic.
    pub fn forward(&mut self, input: &[f64], training: bool) -> Vec<f64> {
        let mut z = self.weights.vec_mul(input);
        for (zi, b) in z.iter_mut().zip(self.biases.iter()) {
            *zi += b;
        }

        let mut a = match self.activation {
            Activation::Softmax => softmax(&z),
            act => z.iter().map(|&x| act.apply(x)).collect(),
        };

        if training && self.dropout > 0.0 {
            let keep = 1.0 - self.dropout;
            let mut rng = rand::thread_rng();
            self.dropout_mask = a
                .iter()
                .map(|_| if rng.gen::<f64>() < keep { 1.0 / keep } else { 0.0 })
                .collect();
            for (ai, m) in a.iter_mut().zip(self.dropout_mask.iter()) {
                *ai *= m;
            }
        } else {
            self.dropout_mask.clear();
        }

        self.pre_activations = z;
        self.activations = a.clone();
        a
    }

    /// Converts an upstream delta (∂L/∂a for this layer's output) into the
    /// local delta ∂L/∂z, folding in the dropout mask and the activation
    /// derivative at the cached pre-activations.
    pub fn local_delta(&self, upstream: &[f64]) -> Vec<f64> {
        assert_eq!(upstream.len(), self.size, "delta length must equal layer size");
        self.pre_activations
            .iter()
            .enumerate()
            .map(|(j, &z)| {
                let mask = self.dropout_mask.get(j).copied().unwrap_or(1.0);
                upstream[j] * mask * self.activation.derivative(z)
            })
            .collect()
    }

    /// Propagates a local delta back to the previous layer's activation space.
    pub fn propagate_delta(&self, local: &[f64]) -> Vec<f64> {
        self.weights.vec_mul_transposed(local)
    }

    /// Applies an averaged gradient step. The fit loop only calls this for
    /// trainable layers.
    pub fn apply_step(&mut self, weight_grad: &Matrix, bias_grad: &[f64], learning_rate: f64) {
        self.weights.add_scaled(weight_grad, -learning_rate);
        for (b, g) in self.biases.iter_mut().zip(bias_grad.iter()) {
            *b -= learning_rate * g;
        }
    }

    pub fn param_count(&self) -> usize {
        self.input_size * self.size + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_output_has_layer_size() {
        let mut layer = Layer::new(4, 3, Activation::ReLU);
        let out = layer.forward(&[0.1, 0.2, 0.3], false);
        assert_eq!(out.len(), 4);
    }

    #[test]
    fn inference_ignores_dropout() {
        let mut layer = Layer::new(8, 2, Activation::Identity).with_dropout(0.5);
        let a = layer.forward(&[1.0, -1.0], false);
        let b = layer.forward(&[1.0, -1.0], false);
        assert_eq!(a, b, "inference must be deterministic under dropout");
    }

    #[test]
    fn dropout_mask_zeroes_local_delta() {
        let mut layer = Layer::new(64, 2, Activation::Identity).with_dropout(0.99);
        layer.forward(&[1.0, 1.0], true);
        let delta = layer.local_delta(&vec![1.0; 64]);
        // With keep probability 0.01 nearly every unit is dropped; the same
        // mask must gate the backward pass.
        let live = delta.iter().filter(|d| **d != 0.0).count();
        assert!(live < 16, "expected most deltas masked, {} live", live);
    }

    #[test]
    fn softmax_layer_outputs_distribution() {
        let mut layer = Layer::new(3, 2, Activation::Softmax);
        let out = layer.forward(&[0.5, -0.5], false);
        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(out.iter().all(|&p| p > 0.0));
    }
}
