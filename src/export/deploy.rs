//! Copies an export bundle into the web app's static-asset directory,
//! merging weight shards into the single `weights.bin` the front end loads.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::export::bundle::{ExportManifest, WeightShard};

/// Reads the bundle in `bundle_dir` and deploys it into `public_dir`:
/// `model.json` (manifest rewritten to reference the merged weights file),
/// `weights.bin` (all shards concatenated in manifest order), `labels.txt`.
pub fn copy_to_web(bundle_dir: &Path, public_dir: &Path) -> Result<()> {
    let raw = fs::read_to_string(bundle_dir.join("model.json"))?;
    let mut manifest: ExportManifest = serde_json::from_str(&raw)?;

    fs::create_dir_all(public_dir)?;

    // Merge shards in manifest order.
    let mut merged = BufWriter::new(File::create(public_dir.join("weights.bin"))?);
    let mut total = 0usize;
    for shard in &manifest.weights {
        let bytes = fs::read(bundle_dir.join(&shard.path))?;
        total += bytes.len();
        merged.write_all(&bytes)?;
    }
    merged.flush()?;

    // The deployed manifest references the merged file, not the shards.
    manifest.weights = vec![WeightShard {
        path: "weights.bin".to_string(),
        bytes: total,
    }];
    let file = File::create(public_dir.join("model.json"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &manifest)?;

    let mut labels = File::create(public_dir.join("labels.txt"))?;
    for label in &manifest.labels {
        writeln!(labels, "{}", label)?;
    }

    println!("[OK] Deployed model.json, weights.bin and labels.txt to {}", public_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CLASSES;
    use crate::export::bundle::export_bundle;
    use crate::model::classifier::Classifier;

    #[test]
    fn deploy_merges_shards_and_rewrites_manifest() {
        let root = tempfile::tempdir().unwrap();
        let bundle_dir = root.path().join("web_model");
        let public_dir = root.path().join("public");

        let classifier = Classifier::new(&CLASSES, None);
        let manifest = export_bundle(&classifier, &bundle_dir).unwrap();
        assert!(manifest.weights.len() > 1, "fixture should produce multiple shards");

        copy_to_web(&bundle_dir, &public_dir).unwrap();

        let merged = fs::read(public_dir.join("weights.bin")).unwrap();
        let expected: Vec<u8> = manifest
            .weights
            .iter()
            .flat_map(|s| fs::read(bundle_dir.join(&s.path)).unwrap())
            .collect();
        assert_eq!(merged, expected);

        let deployed: ExportManifest =
            serde_json::from_str(&fs::read_to_string(public_dir.join("model.json")).unwrap())
                .unwrap();
        assert_eq!(deployed.weights.len(), 1);
        assert_eq!(deployed.weights[0].path, "weights.bin");
        assert_eq!(deployed.weights[0].bytes, merged.len());
    }

    #[test]
    fn deploy_fails_cleanly_without_a_bundle() {
        let root = tempfile::tempdir().unwrap();
        let err = copy_to_web(&root.path().join("missing"), &root.path().join("public"));
        assert!(err.is_err());
    }
}
