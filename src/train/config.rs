use std::path::PathBuf;

use crate::config::{BATCH_SIZE, CHECKPOINT_PATH, EPOCHS, TARGET_ACCURACY};

/// Hyperparameters and stopping policy for one `fit` run.
///
/// `early_stop_patience` is the number of epochs without a validation
/// accuracy gain of at least `min_delta` before training stops and the best
/// weights are restored. `lr_patience` counts epochs of validation-loss
/// plateau before the learning rate is multiplied by `lr_factor`, never
/// dropping below `min_lr`. The best-accuracy snapshot is written to
/// `checkpoint` after each improving epoch.
pub struct TrainConfig {
    pub epochs: usize,
    pub batch_size: usize,
    pub target_accuracy: f64,
    pub early_stop_patience: usize,
    pub min_delta: f64,
    pub lr_patience: usize,
    pub lr_factor: f64,
    pub min_lr: f64,
    pub checkpoint: PathBuf,
}

impl TrainConfig {
    /// Phase 1: head-only training on the frozen backbone. More patience,
    /// since the head starts from scratch and accuracy climbs slowly.
    pub fn phase_one() -> TrainConfig {
        TrainConfig {
            epochs: EPOCHS,
            batch_size: BATCH_SIZE,
            target_accuracy: TARGET_ACCURACY,
            early_stop_patience: 15,
            min_delta: 0.001,
            lr_patience: 5,
            lr_factor: 0.5,
            min_lr: 1e-5,
            checkpoint: PathBuf::from(CHECKPOINT_PATH),
        }
    }

    /// Phase 2: fine-tuning with partially unfrozen backbone. Tighter
    /// patience; the model is already near its plateau.
    pub fn phase_two() -> TrainConfig {
        TrainConfig {
            early_stop_patience: 10,
            lr_patience: 3,
            ..TrainConfig::phase_one()
        }
    }
}
