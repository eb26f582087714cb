use std::path::Path;

use crate::config::{BACKBONE_WEIGHTS_PATH, CLASSES, LEARNING_RATE, TARGET_ACCURACY};
use crate::dataset::loader::Dataset;
use crate::error::Result;
use crate::model::classifier::Classifier;
use crate::nn::sgd::Sgd;
use crate::train::config::TrainConfig;
use crate::train::fit::fit;
use crate::train::history::TrainingHistory;

/// How many backbone layers phase 2 unfreezes for fine-tuning.
const FINE_TUNE_LAYERS: usize = 1;

/// Runs the full two-phase training policy and returns the trained
/// classifier with the merged history.
///
/// Phase 1 trains the head against the frozen backbone. Phase 2 runs only if
/// phase 1 falls short of the accuracy target: the top of the backbone is
/// unfrozen in place (keeping phase 1's weights) and training continues at a
/// tenth of the learning rate.
pub fn train_classifier(data: &Dataset) -> Result<(Classifier, TrainingHistory)> {
    let mut classifier = Classifier::new(&CLASSES, Some(Path::new(BACKBONE_WEIGHTS_PATH)));

    println!("\n{}", "=".repeat(50));
    println!("PHASE 1: Initial Training (Frozen Backbone)");
    println!("{}", "=".repeat(50));
    println!(
        "Training will stop when validation accuracy reaches {:.0}%\n",
        TARGET_ACCURACY * 100.0
    );

    let mut optimizer = Sgd::new(LEARNING_RATE);
    let phase1 = fit(&mut classifier, data, &mut optimizer, &TrainConfig::phase_one())?;
    let mut history = phase1.history;

    if phase1.target_reached {
        println!("\n[SUCCESS] Target accuracy reached in phase 1.");
        return Ok((classifier, history));
    }

    println!(
        "\n[Phase 1 complete] Best validation accuracy: {:.2}%",
        phase1.best_val_accuracy * 100.0
    );
    println!("Proceeding to phase 2: fine-tuning for higher accuracy...");
    println!("\n{}", "=".repeat(50));
    println!("PHASE 2: Fine-Tuning (Unfrozen Backbone Top)");
    println!("{}", "=".repeat(50));

    classifier.unfreeze_top_backbone(FINE_TUNE_LAYERS);
    let mut optimizer = Sgd::new(LEARNING_RATE / 10.0);
    let phase2 = fit(&mut classifier, data, &mut optimizer, &TrainConfig::phase_two())?;
    history.extend(&phase2.history);

    if phase2.target_reached {
        println!("\n[SUCCESS] Target accuracy reached in phase 2.");
    } else {
        println!(
            "\n[Note] Final validation accuracy: {:.2}% (target: {:.0}%)",
            phase2.best_val_accuracy * 100.0,
            TARGET_ACCURACY * 100.0
        );
        println!("Consider adding more training data or raising the epoch budget.");
    }

    Ok((classifier, history))
}
