pub mod config;
pub mod epoch_stats;
pub mod fit;
pub mod history;
pub mod phases;

pub use config::TrainConfig;
pub use epoch_stats::EpochStats;
pub use fit::{fit, FitOutcome};
pub use history::TrainingHistory;
pub use phases::train_classifier;
