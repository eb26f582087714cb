//! Runs the whole workflow in one process: scrape, check counts, train,
//! evaluate, deploy. Each stage asks before running so a partial rerun
//! (say, training only) is a matter of answering n to the rest.

use std::path::Path;

use filmgrain::config::{
    ApiCredentials, CHECKPOINT_PATH, CLASSES, EXPORT_DIR, PUBLIC_DIR,
};
use filmgrain::dataset::inventory;
use filmgrain::dataset::loader::{check_layout, ensure_layout, load_dataset};
use filmgrain::config::{FINAL_MODEL_PATH, VALIDATION_SPLIT};
use filmgrain::eval::{evaluate_model, print_report};
use filmgrain::export::{copy_to_web, export_bundle};
use filmgrain::train::train_classifier;
use filmgrain::{logging, prompt};

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("=== Training pipeline ===");
    println!("Classes: {}", CLASSES.join(", "));

    // Prerequisites: the class directories must exist before any stage runs.
    ensure_layout()?;

    // Stage 1: scraping.
    if prompt::confirm("\nRun the image scraper?") {
        let creds = ApiCredentials::load();
        if creds.any_available() {
            let mut session = filmgrain::scrape::ScrapeSession::new(&creds)?;
            let report = session.run()?;
            println!("Downloaded {} images", report.total_downloaded());
        } else {
            println!("[SKIP] No API keys configured.");
        }
    }

    // Stage 2: inventory gate.
    let report = inventory::readiness();
    inventory::print_report(&report);
    if !report.ready() && !prompt::confirm("Dataset is below the minimum. Train anyway?") {
        println!("Stopping. Collect more images and rerun.");
        return Ok(());
    }

    // Stage 3: training.
    if prompt::confirm("\nTrain the model now?") {
        check_layout()?;
        let data = load_dataset(VALIDATION_SPLIT)?;
        let (mut classifier, history) = train_classifier(&data)?;
        println!(
            "Best validation accuracy: {:.2}%",
            history.best_val_accuracy() * 100.0
        );
        classifier.save_json(FINAL_MODEL_PATH)?;
        export_bundle(&classifier, Path::new(EXPORT_DIR))?;
        println!("[OK] Model saved and bundle exported");
    }

    // Stage 4: evaluation report.
    if prompt::confirm("\nPrint the evaluation report?") {
        match evaluate_model(CHECKPOINT_PATH) {
            Ok(metrics) => {
                let class_names: Vec<String> = CLASSES.iter().map(|c| c.to_string()).collect();
                print_report(&metrics, &class_names);
            }
            Err(err) => println!("[WARN] Evaluation skipped: {}", err),
        }
    }

    // Stage 5: deploy to the web app.
    if Path::new(EXPORT_DIR).join("model.json").exists()
        && prompt::confirm(&format!("\nCopy the bundle into {}/?", PUBLIC_DIR))
    {
        match copy_to_web(Path::new(EXPORT_DIR), Path::new(PUBLIC_DIR)) {
            Ok(()) => {}
            Err(err) => {
                println!("[WARN] Deploy failed: {}", err);
                println!(
                    "Copy {}/model.json and the weight shards into {}/ by hand.",
                    EXPORT_DIR, PUBLIC_DIR
                );
            }
        }
    }

    println!("\nPipeline finished.");
    Ok(())
}
