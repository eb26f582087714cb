//! One scraping run: walk every class, query every available source with the
//! class's search phrases, and download candidates until the quota is met.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{info, warn};

use crate::config::{class_dir, search_keywords, ApiCredentials, CLASSES, IMAGES_PER_CLASS};
use crate::dataset::inventory::count_images;
use crate::error::Result;
use crate::scrape::download::{build_client, download_image};
use crate::scrape::sources::{available_sources, ImageSource, SourceError};

/// Cap per keyword so one phrase cannot dominate a class.
const BATCH_PER_KEYWORD: usize = 40;

const PAUSE_AFTER_KEEP: Duration = Duration::from_millis(500);
const PAUSE_AFTER_REJECT: Duration = Duration::from_millis(200);
const PAUSE_BETWEEN_PAGES: Duration = Duration::from_secs(1);
const PAUSE_BETWEEN_SOURCES: Duration = Duration::from_secs(2);
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Default)]
pub struct ScrapeReport {
    /// (class name, images downloaded this run, images on disk afterwards)
    pub per_class: Vec<(String, usize, usize)>,
}

impl ScrapeReport {
    pub fn total_downloaded(&self) -> usize {
        self.per_class.iter().map(|(_, d, _)| d).sum()
    }
}

pub struct ScrapeSession {
    client: Client,
    sources: Vec<Box<dyn ImageSource>>,
    /// Sources whose key was rejected this run.
    disabled: HashSet<&'static str>,
}

impl ScrapeSession {
    pub fn new(creds: &ApiCredentials) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            sources: available_sources(creds),
            disabled: HashSet::new(),
        })
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Runs the full session over every class.
    pub fn run(&mut self) -> Result<ScrapeReport> {
        let mut report = ScrapeReport::default();
        for class in CLASSES {
            let downloaded = self.collect_class(class)?;
            let on_disk = count_images(&class_dir(class));
            report.per_class.push((class.to_string(), downloaded, on_disk));
        }
        Ok(report)
    }

    /// Downloads images for one class until its quota is met or every
    /// source and keyword is exhausted. Returns how many files were kept.
    pub fn collect_class(&mut self, class: &str) -> Result<usize> {
        let dir = class_dir(class);
        fs::create_dir_all(&dir)?;

        let existing = count_images(&dir);
        if existing >= IMAGES_PER_CLASS {
            info!(class, existing, "quota already met, skipping");
            return Ok(0);
        }
        println!(
            "\n=== {} ({} on disk, targeting {}) ===",
            class, existing, IMAGES_PER_CLASS
        );

        let mut downloaded = 0;
        for keyword in search_keywords(class) {
            let remaining = IMAGES_PER_CLASS - (existing + downloaded);
            if remaining == 0 {
                break;
            }
            let batch = remaining.min(BATCH_PER_KEYWORD);
            println!("  \"{}\" (up to {} images)", keyword, batch);

            let mut kept_for_keyword = 0;
            for i in 0..self.sources.len() {
                if kept_for_keyword >= batch {
                    break;
                }
                if self.disabled.contains(self.sources[i].name()) {
                    continue;
                }
                let kept = self.harvest(i, keyword, class, existing + downloaded + kept_for_keyword,
                    batch - kept_for_keyword)?;
                kept_for_keyword += kept;
                thread::sleep(PAUSE_BETWEEN_SOURCES);
            }
            downloaded += kept_for_keyword;
        }
        println!("  -> {} new images for {}", downloaded, class);
        Ok(downloaded)
    }

    /// Pulls pages from one source for one keyword, downloading candidates
    /// until `quota` files are kept or the source runs dry.
    fn harvest(
        &mut self,
        source_idx: usize,
        keyword: &str,
        class: &str,
        start_index: usize,
        quota: usize,
    ) -> Result<usize> {
        let name = self.sources[source_idx].name();
        let max_pages = self.sources[source_idx].max_pages();
        let mut kept = 0;
        let mut rate_limited_once = false;

        'pages: for page in 0..max_pages {
            let urls = loop {
                match self.sources[source_idx].search(&self.client, keyword, page) {
                    Ok(urls) => break urls,
                    Err(SourceError::Auth) => {
                        warn!(source = name, "key rejected, disabling for this run");
                        self.disabled.insert(name);
                        return Ok(kept);
                    }
                    Err(SourceError::RateLimited) => {
                        if rate_limited_once {
                            warn!(source = name, "rate limited twice, moving on");
                            break 'pages;
                        }
                        rate_limited_once = true;
                        warn!(source = name, "rate limited, sleeping 60s");
                        thread::sleep(RATE_LIMIT_BACKOFF);
                    }
                    Err(err) => {
                        warn!(source = name, %err, "search failed");
                        break 'pages;
                    }
                }
            };
            if urls.is_empty() {
                break;
            }
            info!(source = name, keyword, page, candidates = urls.len(), "search page");

            for url in &urls {
                if kept >= quota {
                    break 'pages;
                }
                let dest = class_dir(class).join(format!("{}_{}.jpg", class, start_index + kept + 1));
                if download_image(&self.client, url, &dest)? {
                    kept += 1;
                    print!(".");
                    let _ = std::io::stdout().flush();
                    thread::sleep(PAUSE_AFTER_KEEP);
                } else {
                    thread::sleep(PAUSE_AFTER_REJECT);
                }
            }
            if kept >= quota {
                break;
            }
            thread::sleep(PAUSE_BETWEEN_PAGES);
        }
        if kept > 0 {
            println!(" [{} kept {} via {}]", class, kept, name);
        }
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_credentials_build_a_session_with_no_sources() {
        let creds = ApiCredentials {
            serpapi: None,
            bing: None,
            apify: None,
            pexels: None,
        };
        let session = ScrapeSession::new(&creds).unwrap();
        assert!(session.source_names().is_empty());
    }

    #[test]
    fn report_totals_sum_per_class_downloads() {
        let report = ScrapeReport {
            per_class: vec![
                ("A".to_string(), 12, 40),
                ("B".to_string(), 0, 200),
                ("C".to_string(), 5, 35),
            ],
        };
        assert_eq!(report.total_downloaded(), 17);
    }
}
