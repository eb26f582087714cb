//! Downloads labeled training images from the configured search APIs.

use filmgrain::config::{ApiCredentials, CLASSES, IMAGES_PER_CLASS, TRAIN_DIR};
use filmgrain::dataset::inventory;
use filmgrain::scrape::ScrapeSession;
use filmgrain::{logging, prompt};

fn main() -> anyhow::Result<()> {
    logging::init();

    println!("Image scraper");
    println!("Classes: {}", CLASSES.join(", "));
    println!("Target: {} images per class into {}/", IMAGES_PER_CLASS, TRAIN_DIR);

    let creds = ApiCredentials::load();
    if !creds.any_available() {
        println!("\nNo API keys found. Set at least one of:");
        println!("  SERPAPI_KEY, BING_SEARCH_KEY, APIFY_API_TOKEN, PEXELS_API_KEY");
        println!("or put them under \"api_keys\" in scrape_config.json.");
        if !prompt::confirm("Continue anyway (nothing will be downloaded)?") {
            return Ok(());
        }
    }

    let mut session = ScrapeSession::new(&creds)?;
    let names = session.source_names();
    if !names.is_empty() {
        println!("Sources: {}", names.join(", "));
    }

    let report = session.run()?;

    println!("\n=== Scrape summary ===");
    for (class, downloaded, on_disk) in &report.per_class {
        println!(
            "  {:<16} +{:<4} ({}/{} on disk)",
            class, downloaded, on_disk, IMAGES_PER_CLASS
        );
    }
    println!("Total downloaded this run: {}", report.total_downloaded());

    // Readiness verdict against the training minimums.
    inventory::print_report(&inventory::readiness());
    Ok(())
}
