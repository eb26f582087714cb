use std::fs;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::RgbImage;
use tracing::warn;

use crate::config::{class_dir, CLASSES, IMAGE_EXTENSIONS, IMAGE_SIZE, TRAIN_DIR};
use crate::error::{Error, Result};

/// One training image with its class index, kept as a decoded RGB raster so
/// the augmenter can re-randomize it every epoch.
pub struct Sample {
    pub image: RgbImage,
    pub label: usize,
}

/// The loaded dataset: raw training rasters plus a pre-flattened validation
/// subset. Validation ordering is deterministic (sorted filenames, per class
/// in class order) so evaluation reproduces the exact same subset.
pub struct Dataset {
    pub class_names: Vec<String>,
    pub train: Vec<Sample>,
    pub val_inputs: Vec<Vec<f64>>,
    pub val_labels: Vec<usize>,
}

impl Dataset {
    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }
}

/// Creates `TRAIN_DIR` and one subdirectory per configured class so every
/// stage can run from a fresh checkout. Existing directories are left alone.
pub fn ensure_layout() -> Result<()> {
    ensure_class_dirs(Path::new(TRAIN_DIR))
}

/// Creates a subdirectory per configured class under `root`.
pub fn ensure_class_dirs(root: &Path) -> Result<()> {
    for name in CLASSES {
        fs::create_dir_all(root.join(name))?;
    }
    Ok(())
}

/// Verifies the directory contract: `TRAIN_DIR` and one subdirectory per
/// configured class. Training and evaluation both fail fast on a violation.
pub fn check_layout() -> Result<()> {
    let root = Path::new(TRAIN_DIR);
    if !root.exists() {
        return Err(Error::TrainDirMissing(root.to_path_buf()));
    }
    let missing: Vec<String> = CLASSES
        .iter()
        .filter(|&&name| !class_dir(name).exists())
        .map(|&name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(Error::MissingClassDirs(missing));
    }
    Ok(())
}

/// Loads every class directory, splitting each class's sorted file list into
/// the first `1 - validation_split` fraction for training and the remainder
/// for validation. Undecodable files are logged and skipped.
pub fn load_dataset(validation_split: f64) -> Result<Dataset> {
    check_layout()?;

    let mut train = Vec::new();
    let mut val_inputs = Vec::new();
    let mut val_labels = Vec::new();

    for (label, &name) in CLASSES.iter().enumerate() {
        let files = image_files_sorted(&class_dir(name))?;
        let n_train = train_count(files.len(), validation_split);

        for (i, path) in files.iter().enumerate() {
            let image = match load_rgb(path) {
                Ok(img) => img,
                Err(e) => {
                    warn!("skipping unreadable image {}: {}", path.display(), e);
                    continue;
                }
            };
            if i < n_train {
                train.push(Sample { image, label });
            } else {
                val_inputs.push(flatten(&image));
                val_labels.push(label);
            }
        }
    }

    if train.is_empty() && val_inputs.is_empty() {
        return Err(Error::EmptyDataset);
    }

    Ok(Dataset {
        class_names: CLASSES.iter().map(|s| s.to_string()).collect(),
        train,
        val_inputs,
        val_labels,
    })
}

/// Number of files assigned to the training subset for a class of `n` files.
pub fn train_count(n: usize, validation_split: f64) -> usize {
    ((n as f64) * (1.0 - validation_split)).round() as usize
}

/// Sorted list of image files directly inside `dir`.
fn image_files_sorted(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| {
                    let lower = ext.to_ascii_lowercase();
                    IMAGE_EXTENSIONS.iter().any(|&known| known == lower)
                })
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Decodes and resizes one image to the network's input raster.
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = image::open(path)?;
    Ok(img
        .resize_exact(IMAGE_SIZE, IMAGE_SIZE, FilterType::Lanczos3)
        .to_rgb8())
}

/// Flattens a raster to the network input layout: R, G, B per pixel,
/// row-major, normalized to [0, 1].
pub fn flatten(image: &RgbImage) -> Vec<f64> {
    image
        .pixels()
        .flat_map(|p| p.0.iter().map(|&c| c as f64 / 255.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn train_count_splits_eighty_twenty() {
        assert_eq!(train_count(10, 0.2), 8);
        assert_eq!(train_count(5, 0.2), 4);
        assert_eq!(train_count(0, 0.2), 0);
        assert_eq!(train_count(1, 0.2), 1);
    }

    #[test]
    fn flatten_normalizes_and_preserves_order() {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, image::Rgb([255, 0, 51]));
        img.put_pixel(1, 0, image::Rgb([0, 255, 0]));

        let flat = flatten(&img);
        assert_eq!(flat.len(), 6);
        assert!((flat[0] - 1.0).abs() < 1e-12);
        assert!((flat[1] - 0.0).abs() < 1e-12);
        assert!((flat[2] - 0.2).abs() < 1e-12);
        assert!((flat[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn ensure_class_dirs_creates_the_layout_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        ensure_class_dirs(dir.path()).unwrap();
        for name in CLASSES {
            assert!(dir.path().join(name).is_dir());
        }
        // A second run over existing directories is a no-op, not an error.
        ensure_class_dirs(dir.path()).unwrap();
    }

    #[test]
    fn sorted_file_listing_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.jpg", "a.jpg", "b.png", "skip.txt"] {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        let files = image_files_sorted(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.png", "c.jpg"]);
    }
}
