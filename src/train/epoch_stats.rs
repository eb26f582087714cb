use serde::{Deserialize, Serialize};

/// Per-epoch training statistics recorded by `fit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number within the current phase.
    pub epoch: usize,
    /// Epoch budget of the current phase.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch (augmented inputs).
    pub train_loss: f64,
    /// Mean validation loss.
    pub val_loss: f64,
    /// Training accuracy in [0, 1], measured on the augmented batches.
    pub train_accuracy: f64,
    /// Validation accuracy in [0, 1].
    pub val_accuracy: f64,
    /// Wall-clock duration of this epoch in milliseconds.
    pub elapsed_ms: u64,
}
