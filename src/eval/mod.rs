pub mod metrics;
pub mod report;

pub use metrics::{argmax, Metrics};
pub use report::print_report;

use crate::config::VALIDATION_SPLIT;
use crate::dataset::loader::{check_layout, load_dataset};
use crate::error::Result;
use crate::model::classifier::Classifier;

/// Loads a saved classifier and scores it on the validation split.
///
/// The split uses the same ratio and deterministic ordering as training, so
/// the scored subset is exactly the one training held out. Fails fast before
/// any metric is computed when the model file or a class directory is absent.
pub fn evaluate_model(model_path: &str) -> Result<Metrics> {
    check_layout()?;
    let mut classifier = Classifier::load_json(model_path)?;

    println!("Loading model from {}...", model_path);
    println!("[OK] Model loaded successfully");

    let data = load_dataset(VALIDATION_SPLIT)?;
    println!(
        "\nEvaluating on validation set: {} samples across {} classes",
        data.val_inputs.len(),
        data.num_classes()
    );

    let predictions: Vec<usize> = data
        .val_inputs
        .iter()
        .map(|input| classifier.predict_class(input))
        .collect();

    Ok(Metrics::compute(
        &data.val_labels,
        &predictions,
        data.num_classes(),
    ))
}
