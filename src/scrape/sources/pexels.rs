use reqwest::blocking::Client;
use serde::Deserialize;

use super::{check_status, ImageSource, SourceError};

const ENDPOINT: &str = "https://api.pexels.com/v1/search";
const RESULTS_PER_PAGE: usize = 80;

/// Pexels stock photo search. Free tier, generous limits, photo-only results.
pub struct PexelsSource {
    api_key: String,
}

impl PexelsSource {
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    src: PhotoSrc,
}

#[derive(Deserialize)]
struct PhotoSrc {
    large: Option<String>,
    medium: Option<String>,
}

impl ImageSource for PexelsSource {
    fn name(&self) -> &'static str {
        "Pexels"
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
        // Pexels pages are 1-based.
        let response = client
            .get(ENDPOINT)
            .header("Authorization", &self.api_key)
            .query(&[
                ("query", query),
                ("per_page", &RESULTS_PER_PAGE.to_string()),
                ("page", &(page + 1).to_string()),
            ])
            .send()?;
        check_status(response.status())?;

        let body: SearchResponse = response.json()?;
        Ok(body
            .photos
            .into_iter()
            .filter_map(|p| p.src.large.or(p.src.medium))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_from_large_to_medium() {
        let raw = r#"{
            "photos": [
                {"src": {"large": "https://p/1-large.jpg", "medium": "https://p/1-med.jpg"}},
                {"src": {"medium": "https://p/2-med.jpg"}},
                {"src": {}}
            ]
        }"#;
        let body: SearchResponse = serde_json::from_str(raw).unwrap();
        let urls: Vec<String> = body
            .photos
            .into_iter()
            .filter_map(|p| p.src.large.or(p.src.medium))
            .collect();
        assert_eq!(urls, vec!["https://p/1-large.jpg", "https://p/2-med.jpg"]);
    }
}
