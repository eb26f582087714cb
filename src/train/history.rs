use serde::{Deserialize, Serialize};

use crate::train::epoch_stats::EpochStats;

/// Accuracy/loss curves accumulated across both training phases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub accuracy: Vec<f64>,
    pub val_accuracy: Vec<f64>,
    pub loss: Vec<f64>,
    pub val_loss: Vec<f64>,
}

impl TrainingHistory {
    pub fn push(&mut self, stats: &EpochStats) {
        self.accuracy.push(stats.train_accuracy);
        self.val_accuracy.push(stats.val_accuracy);
        self.loss.push(stats.train_loss);
        self.val_loss.push(stats.val_loss);
    }

    /// Appends another phase's curves, preserving epoch order.
    pub fn extend(&mut self, other: &TrainingHistory) {
        self.accuracy.extend_from_slice(&other.accuracy);
        self.val_accuracy.extend_from_slice(&other.val_accuracy);
        self.loss.extend_from_slice(&other.loss);
        self.val_loss.extend_from_slice(&other.val_loss);
    }

    pub fn epochs(&self) -> usize {
        self.accuracy.len()
    }

    pub fn best_val_accuracy(&self) -> f64 {
        self.val_accuracy.iter().cloned().fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(val_accuracy: f64) -> EpochStats {
        EpochStats {
            epoch: 1,
            total_epochs: 10,
            train_loss: 0.5,
            val_loss: 0.6,
            train_accuracy: 0.7,
            val_accuracy,
            elapsed_ms: 100,
        }
    }

    #[test]
    fn extend_merges_phases_in_order() {
        let mut phase1 = TrainingHistory::default();
        phase1.push(&stats(0.5));
        phase1.push(&stats(0.6));

        let mut phase2 = TrainingHistory::default();
        phase2.push(&stats(0.8));

        phase1.extend(&phase2);
        assert_eq!(phase1.epochs(), 3);
        assert_eq!(phase1.val_accuracy, vec![0.5, 0.6, 0.8]);
        assert!((phase1.best_val_accuracy() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn best_val_accuracy_of_empty_history_is_zero() {
        assert_eq!(TrainingHistory::default().best_val_accuracy(), 0.0);
    }
}
