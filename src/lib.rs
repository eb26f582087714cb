pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod export;
pub mod logging;
pub mod math;
pub mod model;
pub mod nn;
pub mod prompt;
pub mod scrape;
pub mod train;

// Convenience re-exports
pub use error::{Error, Result};
pub use math::matrix::Matrix;
pub use model::classifier::Classifier;
pub use nn::activation::Activation;
pub use nn::dense::Layer;
pub use nn::network::Network;
pub use train::epoch_stats::EpochStats;
pub use train::history::TrainingHistory;
