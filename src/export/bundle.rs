//! Conversion of a trained classifier into the browser bundle: a JSON graph
//! description plus binary weight shards a JS client can fetch and assemble.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::model::classifier::Classifier;
use crate::model::metadata::InputShape;
use crate::nn::activation::Activation;

/// Weight shards are capped at 4 MiB, the conventional fetch-friendly size.
pub const SHARD_BYTES: usize = 4 * 1024 * 1024;

/// Format tag written into every manifest; bump on layout changes.
pub const FORMAT: &str = "filmgrain-web/1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub size: usize,
    pub input_size: usize,
    pub activation: Activation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightShard {
    pub path: String,
    pub bytes: usize,
}

/// Contents of the exported `model.json`.
///
/// The binary layout referenced by `weights` is: for each layer in order,
/// all weights row-major (input-major) as f32 little-endian, then the biases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportManifest {
    pub format: String,
    pub input: InputShape,
    pub labels: Vec<String>,
    pub layers: Vec<LayerSpec>,
    pub weights: Vec<WeightShard>,
}

/// Writes the full bundle (`model.json`, `weights_N.bin`, `labels.txt`)
/// into `out_dir`, overwriting any previous export.
pub fn export_bundle(classifier: &Classifier, out_dir: &Path) -> Result<ExportManifest> {
    fs::create_dir_all(out_dir)?;

    let blob = weight_blob(classifier);
    let mut shards = Vec::new();
    for (i, chunk) in blob.chunks(SHARD_BYTES).enumerate() {
        let name = format!("weights_{}.bin", i + 1);
        fs::write(out_dir.join(&name), chunk)?;
        shards.push(WeightShard {
            path: name,
            bytes: chunk.len(),
        });
    }

    let manifest = ExportManifest {
        format: FORMAT.to_string(),
        input: classifier.metadata.input.clone(),
        labels: classifier.metadata.labels.clone(),
        layers: classifier
            .network
            .layers
            .iter()
            .map(|l| LayerSpec {
                size: l.size,
                input_size: l.input_size,
                activation: l.activation,
            })
            .collect(),
        weights: shards,
    };

    let file = File::create(out_dir.join("model.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)?;

    let mut labels = File::create(out_dir.join("labels.txt"))?;
    for label in &manifest.labels {
        writeln!(labels, "{}", label)?;
    }

    info!(
        "exported {} parameters in {} shard(s) to {}",
        classifier.network.param_count(),
        manifest.weights.len(),
        out_dir.display()
    );
    Ok(manifest)
}

/// Flattens every layer's weights then biases into one little-endian f32 blob.
fn weight_blob(classifier: &Classifier) -> Vec<u8> {
    let mut blob = Vec::with_capacity(classifier.network.param_count() * 4);
    for layer in &classifier.network.layers {
        for &w in layer.weights.as_slice() {
            blob.extend_from_slice(&(w as f32).to_le_bytes());
        }
        for &b in &layer.biases {
            blob.extend_from_slice(&(b as f32).to_le_bytes());
        }
    }
    blob
}
