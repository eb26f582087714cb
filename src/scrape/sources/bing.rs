use reqwest::blocking::Client;
use serde::Deserialize;

use super::{check_status, ImageSource, SourceError};

const ENDPOINT: &str = "https://api.bing.microsoft.com/v7.0/images/search";
const RESULTS_PER_PAGE: usize = 50;

/// Bing Image Search v7.
pub struct BingSource {
    api_key: String,
}

impl BingSource {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    value: Vec<ImageResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResult {
    content_url: Option<String>,
}

impl ImageSource for BingSource {
    fn name(&self) -> &'static str {
        "Bing"
    }

    fn max_pages(&self) -> usize {
        3
    }

    fn search(
        &self,
        client: &Client,
        query: &str,
        page: usize,
    ) -> Result<Vec<String>, SourceError> {
        let offset = page * RESULTS_PER_PAGE;
        let response = client
            .get(ENDPOINT)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .query(&[
                ("q", query),
                ("count", &RESULTS_PER_PAGE.to_string()),
                ("offset", &offset.to_string()),
            ])
            .send()?;
        check_status(response.status())?;

        let body: SearchResponse = response.json()?;
        Ok(body
            .value
            .into_iter()
            .filter_map(|r| r.content_url)
            .collect())
    }
}
