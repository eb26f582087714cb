use reqwest::blocking::Client;
use serde::Deserialize;

use super::{check_status, ImageSource, SourceError};

const ENDPOINT: &str = "https://serpapi.com/search.json";
const RESULTS_PER_PAGE: usize = 20;

/// Google Images results via SerpApi.
pub struct SerpApiSource {
    api_key: String,
}

impl SerpApiSource {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    images_results: Vec<ImageResult>,
}

#[derive(Deserialize)]
struct ImageResult {
    original: Option<String>,
    link: Option<String>,
}

impl ImageSource for SerpApiSource {
    fn name(&self) -> &'static str {
        "SerpApi"
    }

    fn max_pages(&self) -> usize {
        5
    }

    fn search(
        &self,
        client: &Client,
        query: &str,
        page: usize,
    ) -> Result<Vec<String>, SourceError> {
        let start = page * RESULTS_PER_PAGE;
        let response = client
            .get(ENDPOINT)
            .query(&[
                ("engine", "google_images"),
                ("q", query),
                ("num", &RESULTS_PER_PAGE.to_string()),
                ("start", &start.to_string()),
                ("ijn", &page.to_string()),
                ("api_key", &self.api_key),
            ])
            .send()?;
        check_status(response.status())?;

        let body: SearchResponse = response.json()?;
        Ok(body
            .images_results
            .into_iter()
            .filter_map(|r| r.original.or(r.link))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_original_url_over_link() {
        let raw = r#"{
            "images_results": [
                {"original": "https://a/full.jpg", "link": "https://a/thumb.jpg"},
                {"link": "https://b/only-link.jpg"},
                {"title": "no urls at all"}
            ]
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        let urls: Vec<String> = body
            .images_results
            .into_iter()
            .filter_map(|r| r.original.or(r.link))
            .collect();
        assert_eq!(urls, vec!["https://a/full.jpg", "https://b/only-link.jpg"]);
    }

    #[test]
    fn missing_results_field_parses_as_empty() {
        let body: SearchResponse = serde_json::from_str(r#"{"search_metadata": {}}"#).unwrap();
        assert!(body.images_results.is_empty());
    }
}
