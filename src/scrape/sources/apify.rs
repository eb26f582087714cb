use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{check_status, ImageSource, SourceError};

const ACTOR: &str = "epctex~pinterest-scraper";
const POLL_INTERVAL: Duration = Duration::from_secs(5);
const RUN_TIMEOUT: Duration = Duration::from_secs(300);

/// Pinterest results via an Apify actor run. One actor run per query; the run
/// is started, polled until it finishes, then its dataset is collected.
pub struct ApifySource {
    token: String,
}

impl ApifySource {
    pub fn new(token: String) -> Self {
        Self { token }
    }
}

#[derive(Deserialize)]
struct RunEnvelope {
    data: RunData,
}

#[derive(Deserialize)]
struct RunData {
    id: String,
    status: String,
    #[serde(rename = "defaultDatasetId")]
    default_dataset_id: Option<String>,
}

#[derive(Deserialize)]
struct DatasetItem {
    image: Option<String>,
    image_url: Option<String>,
}

impl ImageSource for ApifySource {
    fn name(&self) -> &'static str {
        "Apify"
    }

    fn search(
        &self,
        client: &Client,
        query: &str,
        _page: usize,
    ) -> Result<Vec<String>, SourceError> {
        let response = client
            .post(format!("https://api.apify.com/v2/acts/{}/runs", ACTOR))
            .bearer_auth(&self.token)
            .json(&json!({
                "search": [query],
                "maxItems": 50,
            }))
            .send()?;
        check_status(response.status())?;
        let run: RunEnvelope = response.json()?;

        let data = self.wait_for_run(client, &run.data.id)?;
        let dataset_id = data
            .default_dataset_id
            .ok_or_else(|| SourceError::Provider("run has no dataset".to_string()))?;

        let response = client
            .get(format!(
                "https://api.apify.com/v2/datasets/{}/items",
                dataset_id
            ))
            .bearer_auth(&self.token)
            .send()?;
        check_status(response.status())?;
        let items: Vec<DatasetItem> = response.json()?;

        Ok(items
            .into_iter()
            .filter_map(|i| i.image.or(i.image_url))
            .collect())
    }
}

impl ApifySource {
    fn wait_for_run(&self, client: &Client, run_id: &str) -> Result<RunData, SourceError> {
        let deadline = Instant::now() + RUN_TIMEOUT;
        loop {
            thread::sleep(POLL_INTERVAL);
            let response = client
                .get(format!("https://api.apify.com/v2/actor-runs/{}", run_id))
                .bearer_auth(&self.token)
                .send()?;
            check_status(response.status())?;
            let run: RunEnvelope = response.json()?;
            debug!(status = %run.data.status, "apify run poll");
            match run.data.status.as_str() {
                "SUCCEEDED" => return Ok(run.data),
                "RUNNING" | "READY" => {
                    if Instant::now() >= deadline {
                        return Err(SourceError::Provider("actor run timed out".to_string()));
                    }
                }
                other => {
                    return Err(SourceError::Provider(format!("actor run ended: {}", other)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_items_accept_either_url_field() {
        let raw = r#"[
            {"image": "https://pin/1.jpg"},
            {"image_url": "https://pin/2.jpg", "title": "x"},
            {"title": "no image"}
        ]"#;
        let items: Vec<DatasetItem> = serde_json::from_str(raw).unwrap();
        let urls: Vec<String> = items.into_iter().filter_map(|i| i.image.or(i.image_url)).collect();
        assert_eq!(urls, vec!["https://pin/1.jpg", "https://pin/2.jpg"]);
    }

    #[test]
    fn run_envelope_parses_dataset_id() {
        let raw = r#"{"data": {"id": "run1", "status": "SUCCEEDED", "defaultDatasetId": "ds1"}}"#;
        let run: RunEnvelope = serde_json::from_str(raw).unwrap();
        assert_eq!(run.data.status, "SUCCEEDED");
        assert_eq!(run.data.default_dataset_id.as_deref(), Some("ds1"));
    }
}
