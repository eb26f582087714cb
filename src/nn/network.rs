use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::nn::dense::Layer;

/// A stack of dense layers, input to output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
}

impl Network {
    pub fn new(layers: Vec<Layer>) -> Network {
        Network { layers }
    }

    /// Forward pass for one sample; stores per-layer activations for backprop
    /// when `training` is set.
    pub fn forward(&mut self, input: &[f64], training: bool) -> Vec<f64> {
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.forward(&current, training);
        }
        current
    }

    /// Inference-mode forward pass (no dropout).
    pub fn predict(&mut self, input: &[f64]) -> Vec<f64> {
        self.forward(input, false)
    }

    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|l| l.param_count()).sum()
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Deserializes a network from a JSON file written by `save_json`.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Network> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::activation::Activation;

    fn tiny_network() -> Network {
        Network::new(vec![
            Layer::new(4, 3, Activation::ReLU),
            Layer::new(2, 4, Activation::Softmax),
        ])
    }

    #[test]
    fn forward_produces_output_distribution() {
        let mut net = tiny_network();
        let out = net.predict(&[0.1, 0.5, 0.9]);
        assert_eq!(out.len(), 2);
        assert!((out.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn save_load_round_trip_preserves_predictions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");

        let mut net = tiny_network();
        let before = net.predict(&[0.3, 0.3, 0.3]);
        net.save_json(&path).unwrap();

        let mut reloaded = Network::load_json(&path).unwrap();
        let after = reloaded.predict(&[0.3, 0.3, 0.3]);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn param_count_matches_shapes() {
        let net = tiny_network();
        assert_eq!(net.param_count(), 3 * 4 + 4 + 4 * 2 + 2);
    }
}
