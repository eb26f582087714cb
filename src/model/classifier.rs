use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{IMAGE_SIZE, INPUT_DIM};
use crate::error::{Error, Result};
use crate::model::metadata::{InputShape, ModelMetadata};
use crate::nn::activation::Activation;
use crate::nn::dense::Layer;
use crate::nn::network::Network;

/// Hidden widths of the pretrained feature-extraction backbone.
const BACKBONE_WIDTHS: [usize; 3] = [512, 256, 128];

/// Hidden width of the trainable classification head.
const HEAD_WIDTH: usize = 64;

/// Dropout rate on the head's hidden layer.
const HEAD_DROPOUT: f64 = 0.5;

/// Transfer-learning classifier: a feature-extraction backbone (frozen in
/// phase 1) followed by a small trainable head ending in Softmax.
///
/// `backbone_layers` marks the boundary: layers `0..backbone_layers` belong
/// to the backbone, the rest to the head.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    pub network: Network,
    pub backbone_layers: usize,
    pub metadata: ModelMetadata,
}

impl Classifier {
    /// Builds a fresh classifier for the given labels.
    ///
    /// When `pretrained` names a readable backbone weights file its layers
    /// replace the randomly-initialized backbone; otherwise training starts
    /// from He initialization with a warning (the model still trains, just
    /// without the transfer-learning head start).
    pub fn new(labels: &[&str], pretrained: Option<&Path>) -> Classifier {
        let n_classes = labels.len();

        let mut layers = Vec::new();
        let mut fan_in = INPUT_DIM;
        for width in BACKBONE_WIDTHS {
            let mut layer = Layer::new(width, fan_in, Activation::ReLU);
            layer.trainable = false;
            layers.push(layer);
            fan_in = width;
        }
        layers.push(Layer::new(HEAD_WIDTH, fan_in, Activation::ReLU).with_dropout(HEAD_DROPOUT));
        layers.push(Layer::new(n_classes, HEAD_WIDTH, Activation::Softmax));

        let mut classifier = Classifier {
            network: Network::new(layers),
            backbone_layers: BACKBONE_WIDTHS.len(),
            metadata: ModelMetadata {
                description: Some("visual-style classifier (backbone + softmax head)".into()),
                input: InputShape {
                    width: IMAGE_SIZE,
                    height: IMAGE_SIZE,
                    channels: 3,
                },
                labels: labels.iter().map(|s| s.to_string()).collect(),
            },
        };

        match pretrained {
            Some(path) if path.exists() => classifier.load_backbone(path),
            Some(path) => warn!(
                "pretrained backbone {} not found; using random initialization",
                path.display()
            ),
            None => {}
        }

        classifier
    }

    /// Replaces the backbone layers with pretrained weights, keeping them
    /// frozen. Shape mismatches keep the random initialization instead.
    fn load_backbone(&mut self, path: &Path) {
        let pretrained = match Network::load_json(path) {
            Ok(net) => net,
            Err(e) => {
                warn!("could not read pretrained backbone {}: {}", path.display(), e);
                return;
            }
        };

        if pretrained.layers.len() != self.backbone_layers {
            warn!(
                "pretrained backbone has {} layers, expected {}; keeping random initialization",
                pretrained.layers.len(),
                self.backbone_layers
            );
            return;
        }
        for (existing, loaded) in self.network.layers.iter().zip(pretrained.layers.iter()) {
            if existing.size != loaded.size || existing.input_size != loaded.input_size {
                warn!(
                    "pretrained backbone shape mismatch ({}x{} vs {}x{}); keeping random initialization",
                    loaded.input_size, loaded.size, existing.input_size, existing.size
                );
                return;
            }
        }

        for (slot, mut loaded) in self.network.layers[..self.backbone_layers]
            .iter_mut()
            .zip(pretrained.layers.into_iter())
        {
            loaded.trainable = false;
            *slot = loaded;
        }
        info!("loaded pretrained backbone from {}", path.display());
    }

    /// Phase-2 fine-tuning switch: unfreezes the last `count` backbone
    /// layers in place, preserving the weights learned so far.
    pub fn unfreeze_top_backbone(&mut self, count: usize) {
        let start = self.backbone_layers.saturating_sub(count);
        for layer in &mut self.network.layers[start..self.backbone_layers] {
            layer.trainable = true;
        }
        info!(
            "fine-tuning enabled: last {} backbone layer(s) trainable",
            self.backbone_layers - start
        );
    }

    pub fn labels(&self) -> &[String] {
        &self.metadata.labels
    }

    pub fn num_classes(&self) -> usize {
        self.metadata.labels.len()
    }

    /// Predicted class index for one flattened input.
    pub fn predict_class(&mut self, input: &[f64]) -> usize {
        let probs = self.network.predict(input);
        crate::eval::metrics::argmax(&probs)
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads a saved classifier, failing with `ModelNotFound` when the file
    /// is absent so callers can print a precise diagnostic.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Classifier> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ModelNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CLASSES;

    #[test]
    fn backbone_is_frozen_and_head_trainable() {
        let clf = Classifier::new(&CLASSES, None);
        let (backbone, head) = clf.network.layers.split_at(clf.backbone_layers);
        assert!(backbone.iter().all(|l| !l.trainable));
        assert!(head.iter().all(|l| l.trainable));
    }

    #[test]
    fn unfreeze_top_backbone_flips_only_the_tail() {
        let mut clf = Classifier::new(&CLASSES, None);
        clf.unfreeze_top_backbone(1);
        let flags: Vec<bool> = clf.network.layers[..clf.backbone_layers]
            .iter()
            .map(|l| l.trainable)
            .collect();
        assert_eq!(flags, vec![false, false, true]);
    }

    #[test]
    fn load_missing_model_reports_model_not_found() {
        let err = Classifier::load_json("no_such_model.json").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[test]
    fn save_load_round_trip_keeps_structure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clf.json");

        let clf = Classifier::new(&CLASSES, None);
        clf.save_json(&path).unwrap();
        let reloaded = Classifier::load_json(&path).unwrap();

        assert_eq!(reloaded.backbone_layers, clf.backbone_layers);
        assert_eq!(reloaded.labels(), clf.labels());
        assert_eq!(reloaded.network.param_count(), clf.network.param_count());
        // Frozen flags survive the round trip.
        assert!(reloaded.network.layers[..reloaded.backbone_layers]
            .iter()
            .all(|l| !l.trainable));
    }
}
