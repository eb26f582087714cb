//! Scores the checkpointed model on the held-out validation split.

use filmgrain::config::{CHECKPOINT_PATH, CLASSES};
use filmgrain::error::Error;
use filmgrain::eval::{evaluate_model, print_report};
use filmgrain::logging;

fn main() -> anyhow::Result<()> {
    logging::init();

    match evaluate_model(CHECKPOINT_PATH) {
        Ok(metrics) => {
            let class_names: Vec<String> = CLASSES.iter().map(|c| c.to_string()).collect();
            print_report(&metrics, &class_names);
            Ok(())
        }
        Err(Error::ModelNotFound(path)) => {
            println!("[ERROR] No trained model at {}", path.display());
            println!("Run the trainer first to produce a checkpoint.");
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
