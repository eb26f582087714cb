use std::time::Instant;

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::dataset::augment::random_augment;
use crate::dataset::loader::{flatten, Dataset};
use crate::error::Result;
use crate::eval::metrics::argmax;
use crate::math::matrix::Matrix;
use crate::model::classifier::Classifier;
use crate::nn::loss::{one_hot, CrossEntropyLoss};
use crate::nn::sgd::Sgd;
use crate::train::config::TrainConfig;
use crate::train::epoch_stats::EpochStats;
use crate::train::history::TrainingHistory;

/// Result of one `fit` phase.
pub struct FitOutcome {
    pub history: TrainingHistory,
    pub best_val_accuracy: f64,
    /// True when the run halted because validation accuracy reached
    /// `config.target_accuracy`.
    pub target_reached: bool,
}

/// Trains `classifier` in place with mini-batch SGD until the epoch budget is
/// exhausted, the accuracy target is reached, or validation accuracy stops
/// improving for the configured patience window.
///
/// Per epoch: training samples are re-augmented, shuffled and consumed in
/// mini-batches; only trainable layers receive optimizer steps (this is how
/// the frozen backbone stays fixed). After each epoch the validation set is
/// scored; an improving epoch overwrites the checkpoint file and the
/// in-memory best snapshot. On an early stop the best weights are restored.
/// A validation-loss plateau halves the learning rate down to `min_lr`.
pub fn fit(
    classifier: &mut Classifier,
    data: &Dataset,
    optimizer: &mut Sgd,
    config: &TrainConfig,
) -> Result<FitOutcome> {
    assert!(!data.train.is_empty(), "training subset must not be empty");
    assert!(config.batch_size > 0, "batch_size must be at least 1");

    let n_classes = classifier.num_classes();
    let n_layers = classifier.network.layers.len();

    if data.val_inputs.is_empty() {
        warn!("validation set is empty; early stopping and the accuracy target cannot trigger");
    }

    // Backprop never needs to descend below the lowest trainable layer.
    let lowest_trainable = classifier
        .network
        .layers
        .iter()
        .position(|l| l.trainable)
        .unwrap_or(n_layers);

    // Gradient accumulators, allocated once, only for trainable layers.
    let mut accumulators: Vec<Option<(Matrix, Vec<f64>)>> = classifier
        .network
        .layers
        .iter()
        .map(|layer| {
            layer
                .trainable
                .then(|| (Matrix::zeros(layer.input_size, layer.size), vec![0.0; layer.size]))
        })
        .collect();

    let mut rng = rand::thread_rng();
    let mut indices: Vec<usize> = (0..data.train.len()).collect();

    let mut history = TrainingHistory::default();
    let mut best_snapshot = classifier.network.clone();
    let mut best_checkpoint_acc = f64::NEG_INFINITY;
    let mut best_early_stop_acc = f64::NEG_INFINITY;
    let mut early_stop_wait = 0usize;
    let mut best_val_loss = f64::INFINITY;
    let mut plateau_wait = 0usize;
    let mut target_reached = false;
    let mut prev_val_accuracy: Option<f64> = None;

    let run_start = Instant::now();
    let mut epoch_times: Vec<f64> = Vec::new();

    for epoch in 1..=config.epochs {
        let epoch_start = Instant::now();
        indices.shuffle(&mut rng);

        let mut epoch_loss = 0.0;
        let mut correct = 0usize;

        for batch in indices.chunks(config.batch_size) {
            for &idx in batch {
                let sample = &data.train[idx];
                let input = flatten(&random_augment(&sample.image, &mut rng));
                let target = one_hot(sample.label, n_classes);

                let output = classifier.network.forward(&input, true);
                epoch_loss += CrossEntropyLoss::loss(&output, &target);
                if argmax(&output) == sample.label {
                    correct += 1;
                }

                // Backward pass; gradients accumulate over the mini-batch.
                let mut upstream = CrossEntropyLoss::derivative(&output, &target);
                let layers = &classifier.network.layers;
                for i in (lowest_trainable..n_layers).rev() {
                    let local = layers[i].local_delta(&upstream);
                    if let Some((w_acc, b_acc)) = accumulators[i].as_mut() {
                        let layer_input: &[f64] = if i == 0 {
                            &input
                        } else {
                            &layers[i - 1].activations
                        };
                        w_acc.add_outer(layer_input, &local);
                        for (b, g) in b_acc.iter_mut().zip(local.iter()) {
                            *b += g;
                        }
                    }
                    if i > lowest_trainable {
                        upstream = layers[i].propagate_delta(&local);
                    }
                }
            }

            // Averaged step, then reset the accumulators.
            let step_rate = optimizer.learning_rate / batch.len() as f64;
            for (i, slot) in accumulators.iter_mut().enumerate() {
                if let Some((w_acc, b_acc)) = slot {
                    classifier.network.layers[i].apply_step(w_acc, b_acc, step_rate);
                    w_acc.fill(0.0);
                    b_acc.iter_mut().for_each(|b| *b = 0.0);
                }
            }
        }

        let (val_loss, val_accuracy) = validate(classifier, data, n_classes);

        let elapsed = epoch_start.elapsed().as_secs_f64();
        epoch_times.push(elapsed);

        let stats = EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss: epoch_loss / data.train.len() as f64,
            val_loss,
            train_accuracy: correct as f64 / data.train.len() as f64,
            val_accuracy,
            elapsed_ms: (elapsed * 1000.0) as u64,
        };
        history.push(&stats);
        print_progress(&stats, config, run_start, &epoch_times, prev_val_accuracy);
        prev_val_accuracy = Some(val_accuracy);

        // Checkpoint on every strict improvement of validation accuracy.
        if val_accuracy > best_checkpoint_acc {
            best_checkpoint_acc = val_accuracy;
            best_snapshot = classifier.network.clone();
            classifier.save_json(&config.checkpoint)?;
            info!(
                "checkpoint saved to {} (val accuracy {:.2}%)",
                config.checkpoint.display(),
                val_accuracy * 100.0
            );
        }

        // Accuracy target: stop immediately once crossed.
        if !data.val_inputs.is_empty() && val_accuracy >= config.target_accuracy {
            println!(
                "\n[SUCCESS] Target accuracy of {:.0}% reached (epoch {}, val accuracy {:.2}%)",
                config.target_accuracy * 100.0,
                epoch,
                val_accuracy * 100.0
            );
            println!("Stopping training early to prevent overfitting.");
            target_reached = true;
            break;
        }

        // Early stopping on a stalled validation accuracy.
        if val_accuracy > best_early_stop_acc + config.min_delta {
            best_early_stop_acc = val_accuracy;
            early_stop_wait = 0;
        } else {
            early_stop_wait += 1;
            if early_stop_wait >= config.early_stop_patience {
                println!(
                    "\n[EARLY STOP] No val-accuracy improvement for {} epochs; restoring best weights ({:.2}%)",
                    config.early_stop_patience,
                    best_checkpoint_acc * 100.0
                );
                classifier.network = best_snapshot.clone();
                break;
            }
        }

        // Learning-rate schedule: halve on a validation-loss plateau.
        if val_loss < best_val_loss {
            best_val_loss = val_loss;
            plateau_wait = 0;
        } else {
            plateau_wait += 1;
            if plateau_wait >= config.lr_patience {
                let reduced = (optimizer.learning_rate * config.lr_factor).max(config.min_lr);
                if reduced < optimizer.learning_rate {
                    info!(
                        "val loss plateaued; reducing learning rate {} -> {}",
                        optimizer.learning_rate, reduced
                    );
                    optimizer.learning_rate = reduced;
                }
                plateau_wait = 0;
            }
        }
    }

    Ok(FitOutcome {
        best_val_accuracy: history.best_val_accuracy(),
        history,
        target_reached,
    })
}

/// Mean loss and accuracy over the validation subset in inference mode.
fn validate(classifier: &mut Classifier, data: &Dataset, n_classes: usize) -> (f64, f64) {
    let n = data.val_inputs.len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mut loss = 0.0;
    let mut correct = 0usize;
    for (input, &label) in data.val_inputs.iter().zip(data.val_labels.iter()) {
        let output = classifier.network.predict(input);
        loss += CrossEntropyLoss::loss(&output, &one_hot(label, n_classes));
        if argmax(&output) == label {
            correct += 1;
        }
    }
    (loss / n as f64, correct as f64 / n as f64)
}

/// One human-readable line per epoch, with a rough time-remaining estimate
/// derived from the recent accuracy-improvement rate.
fn print_progress(
    stats: &EpochStats,
    config: &TrainConfig,
    run_start: Instant,
    epoch_times: &[f64],
    prev_val_accuracy: Option<f64>,
) {
    let avg_epoch = epoch_times.iter().sum::<f64>() / epoch_times.len() as f64;
    let total = run_start.elapsed().as_secs_f64();

    let epochs_remaining = match prev_val_accuracy {
        Some(prev) if prev > 0.0 => {
            let rate = (stats.val_accuracy - prev).max(0.001);
            let gap = (config.target_accuracy - stats.val_accuracy).max(0.0);
            ((gap / rate).ceil() as usize).max(1)
        }
        _ => 15,
    };
    let remaining = avg_epoch * epochs_remaining as f64;

    println!(
        "[Epoch {}/{}] val acc {:.2}% | train loss {:.4} | epoch {:.1}s | total {:.1}min | est. remaining ~{:.1}min",
        stats.epoch,
        stats.total_epochs,
        stats.val_accuracy * 100.0,
        stats.train_loss,
        epoch_times.last().copied().unwrap_or(0.0),
        total / 60.0,
        remaining / 60.0
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::metadata::{InputShape, ModelMetadata};
    use crate::nn::activation::Activation;
    use crate::nn::dense::Layer;
    use crate::nn::network::Network;
    use image::RgbImage;
    use std::path::PathBuf;

    fn solid(color: [u8; 3]) -> RgbImage {
        let mut img = RgbImage::new(8, 8);
        for p in img.pixels_mut() {
            *p = image::Rgb(color);
        }
        img
    }

    /// A deliberately tiny classifier over 8×8 RGB inputs with every layer
    /// trainable, so fit converges in a handful of epochs.
    fn tiny_classifier() -> Classifier {
        Classifier {
            network: Network::new(vec![
                Layer::new(8, 192, Activation::ReLU),
                Layer::new(2, 8, Activation::Softmax),
            ]),
            backbone_layers: 0,
            metadata: ModelMetadata {
                description: None,
                input: InputShape {
                    width: 8,
                    height: 8,
                    channels: 3,
                },
                labels: vec!["RED".into(), "BLUE".into()],
            },
        }
    }

    fn color_dataset() -> Dataset {
        let mut train = Vec::new();
        let mut val_inputs = Vec::new();
        let mut val_labels = Vec::new();
        for i in 0..12 {
            // Slight per-sample variation so the problem is not degenerate.
            let shade = 180 + (i * 6) as u8;
            train.push(crate::dataset::loader::Sample {
                image: solid([shade, 20, 20]),
                label: 0,
            });
            train.push(crate::dataset::loader::Sample {
                image: solid([20, 20, shade]),
                label: 1,
            });
        }
        for shade in [190u8, 230u8] {
            val_inputs.push(flatten(&solid([shade, 20, 20])));
            val_labels.push(0);
            val_inputs.push(flatten(&solid([20, 20, shade])));
            val_labels.push(1);
        }
        Dataset {
            class_names: vec!["RED".into(), "BLUE".into()],
            train,
            val_inputs,
            val_labels,
        }
    }

    fn quick_config(checkpoint: PathBuf) -> TrainConfig {
        TrainConfig {
            epochs: 60,
            batch_size: 4,
            target_accuracy: 0.9,
            early_stop_patience: 60,
            min_delta: 0.001,
            lr_patience: 60,
            lr_factor: 0.5,
            min_lr: 1e-5,
            checkpoint,
        }
    }

    #[test]
    fn fit_halts_at_target_and_checkpoint_reproduces_accuracy() {
        let dir = tempfile::tempdir().unwrap();
        let checkpoint = dir.path().join("best.json");

        let mut classifier = tiny_classifier();
        let data = color_dataset();
        let mut optimizer = Sgd::new(0.5);
        let config = quick_config(checkpoint.clone());

        let outcome = fit(&mut classifier, &data, &mut optimizer, &config).unwrap();

        assert!(
            outcome.target_reached,
            "red-vs-blue should reach 90% val accuracy, best was {:.2}",
            outcome.best_val_accuracy
        );
        assert!(outcome.history.epochs() < config.epochs);

        // The persisted checkpoint reflects the stopping epoch's weights:
        // re-scoring it reproduces the recorded validation accuracy.
        let mut reloaded = Classifier::load_json(&checkpoint).unwrap();
        let (_, val_accuracy) = validate(&mut reloaded, &data, 2);
        assert!(
            (val_accuracy - outcome.best_val_accuracy).abs() < 1e-9,
            "checkpoint accuracy {val_accuracy} != recorded {}",
            outcome.best_val_accuracy
        );
    }

    #[test]
    fn frozen_layers_do_not_move() {
        let dir = tempfile::tempdir().unwrap();
        let mut classifier = tiny_classifier();
        classifier.backbone_layers = 1;
        classifier.network.layers[0].trainable = false;
        let frozen_before = classifier.network.layers[0].weights.clone();

        let data = color_dataset();
        let mut optimizer = Sgd::new(0.5);
        let mut config = quick_config(dir.path().join("best.json"));
        config.epochs = 3;
        config.target_accuracy = 2.0; // unreachable; run all epochs

        fit(&mut classifier, &data, &mut optimizer, &config).unwrap();

        // Early stop restore could mask this, so compare directly.
        assert_eq!(classifier.network.layers[0].weights, frozen_before);
    }

    #[test]
    fn plateau_schedule_never_reduces_below_the_floor() {
        let dir = tempfile::tempdir().unwrap();
        let mut classifier = tiny_classifier();
        let data = color_dataset();
        // Start at the floor: plateaus may fire but the rate must not move.
        let mut optimizer = Sgd::new(1e-5);
        let mut config = quick_config(dir.path().join("best.json"));
        config.epochs = 8;
        config.lr_patience = 2;
        config.target_accuracy = 2.0;
        config.early_stop_patience = 100;

        fit(&mut classifier, &data, &mut optimizer, &config).unwrap();
        assert_eq!(optimizer.learning_rate, 1e-5);
    }
}
