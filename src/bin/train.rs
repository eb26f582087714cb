//! Trains the classifier and exports the web bundle.

use std::path::Path;

use filmgrain::config::{
    EXPORT_DIR, FINAL_MODEL_PATH, MIN_IMAGES_PER_CLASS, VALIDATION_SPLIT,
};
use filmgrain::dataset::loader::{check_layout, load_dataset};
use filmgrain::dataset::inventory::class_counts;
use filmgrain::eval::Metrics;
use filmgrain::export::export_bundle;
use filmgrain::logging;
use filmgrain::train::train_classifier;

fn main() -> anyhow::Result<()> {
    logging::init();

    check_layout()?;

    println!("Training data:");
    let mut low = Vec::new();
    for (class, count) in class_counts() {
        println!("  {:<16} {} images", class, count);
        if count < MIN_IMAGES_PER_CLASS {
            low.push(class);
        }
    }
    if !low.is_empty() {
        println!(
            "[WARN] Fewer than {} images for: {}. Accuracy will suffer.",
            MIN_IMAGES_PER_CLASS,
            low.join(", ")
        );
    }

    let data = load_dataset(VALIDATION_SPLIT)?;
    println!(
        "Loaded {} training / {} validation samples",
        data.train.len(),
        data.val_inputs.len()
    );

    let (mut classifier, history) = train_classifier(&data)?;
    println!(
        "\nTraining finished after {} epochs (best val accuracy {:.2}%)",
        history.epochs(),
        history.best_val_accuracy() * 100.0
    );

    let predictions: Vec<usize> = data
        .val_inputs
        .iter()
        .map(|input| classifier.predict_class(input))
        .collect();
    let metrics = Metrics::compute(&data.val_labels, &predictions, data.num_classes());
    println!("Final validation accuracy: {:.2}%", metrics.accuracy() * 100.0);

    classifier.save_json(FINAL_MODEL_PATH)?;
    println!("[OK] Saved final model to {}", FINAL_MODEL_PATH);

    export_bundle(&classifier, Path::new(EXPORT_DIR))?;
    println!("[OK] Exported web bundle to {}/", EXPORT_DIR);
    Ok(())
}
