//! Fixed configuration shared by every pipeline stage.
//!
//! The class set is closed and ordered: the position of a name in `CLASSES`
//! is both its directory name under `TRAIN_DIR` and its output index in the
//! trained network. Changing the order invalidates saved models.

/// Root directory for the per-class training image folders.
pub const TRAIN_DIR: &str = "training_data";

/// Ordered class labels. Index in this array == model output index.
pub const CLASSES: [&str; 3] = ["VINTAGE_FILM", "MODERN_DIGITAL", "OTHER"];

/// Target number of images per class for the scraper.
pub const IMAGES_PER_CLASS: usize = 200;

/// Minimum images per class before training is considered worthwhile.
pub const MIN_IMAGES_PER_CLASS: usize = 30;

/// Images are resized to IMAGE_SIZE × IMAGE_SIZE RGB before entering the network.
pub const IMAGE_SIZE: u32 = 64;

/// Flattened network input dimension: 64 × 64 × 3.
pub const INPUT_DIM: usize = (IMAGE_SIZE as usize) * (IMAGE_SIZE as usize) * 3;

/// Mini-batch size for SGD.
pub const BATCH_SIZE: usize = 32;

/// Epoch budget per training phase.
pub const EPOCHS: usize = 50;

/// Phase-1 learning rate; phase 2 uses a tenth of this.
pub const LEARNING_RATE: f64 = 0.001;

/// Training halts as soon as validation accuracy reaches this threshold.
pub const TARGET_ACCURACY: f64 = 0.90;

/// Fraction of each class held out for validation.
pub const VALIDATION_SPLIT: f64 = 0.2;

/// Path of the best-validation-accuracy checkpoint.
pub const CHECKPOINT_PATH: &str = "best_model.json";

/// Path of the final model written at the end of training.
pub const FINAL_MODEL_PATH: &str = "final_model.json";

/// Optional pretrained backbone weights; He-init fallback when absent.
pub const BACKBONE_WEIGHTS_PATH: &str = "backbone_weights.json";

/// Output directory for the browser export bundle.
pub const EXPORT_DIR: &str = "web_model";

/// Static-asset directory of the web front end.
pub const PUBLIC_DIR: &str = "public";

/// File extensions recognized as training images (matched case-insensitively).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Search phrases tried in order when scraping a class.
///
/// Labels are assigned by search intent, not verified visual content; the
/// negative and OTHER classes in particular can contain mislabeled samples.
pub fn search_keywords(class_name: &str) -> &'static [&'static str] {
    match class_name {
        "VINTAGE_FILM" => &[
            "vintage film photography",
            "35mm film grain photo",
            "analog film aesthetic",
            "faded kodachrome photo",
            "retro film camera shot",
            "expired film photography",
            "polaroid style photo",
        ],
        "MODERN_DIGITAL" => &[
            "modern digital photography",
            "sharp hdr photo",
            "smartphone photography",
            "crisp digital snapshot",
            "contemporary stock photo",
            "clean product photography",
            "high resolution photo",
        ],
        "OTHER" => &[
            "abstract art photography",
            "black and white portrait",
            "illustration artwork",
            "cinematic still frame",
            "long exposure night photo",
            "macro nature photography",
            "studio fashion photography",
        ],
        _ => &[],
    }
}

/// Directory holding a class's images: `training_data/<CLASS_NAME>`.
pub fn class_dir(class_name: &str) -> std::path::PathBuf {
    std::path::Path::new(TRAIN_DIR).join(class_name)
}
