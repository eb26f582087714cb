//! Image search providers. Each source turns a text query into a page of
//! candidate image URLs; the session layer handles downloading and pacing.

mod apify;
mod bing;
mod pexels;
mod serpapi;

pub use apify::ApifySource;
pub use bing::BingSource;
pub use pexels::PexelsSource;
pub use serpapi::SerpApiSource;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::ApiCredentials;

#[derive(Debug, Error)]
pub enum SourceError {
    /// The API rejected our key. The source is useless for the rest of the run.
    #[error("authentication rejected")]
    Auth,
    /// The API asked us to slow down.
    #[error("rate limited")]
    RateLimited,
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("provider error: {0}")]
    Provider(String),
}

/// A provider of image search results.
pub trait ImageSource {
    fn name(&self) -> &'static str;

    /// How many result pages to request per query before moving on.
    fn max_pages(&self) -> usize {
        1
    }

    /// Fetches one page of image URLs for `query`. `page` starts at 0.
    fn search(&self, client: &Client, query: &str, page: usize)
        -> Result<Vec<String>, SourceError>;
}

/// Builds the sources we have credentials for, in preference order.
pub fn available_sources(creds: &ApiCredentials) -> Vec<Box<dyn ImageSource>> {
    let mut sources: Vec<Box<dyn ImageSource>> = Vec::new();
    if let Some(key) = &creds.serpapi {
        sources.push(Box::new(SerpApiSource::new(key.clone())));
    }
    if let Some(key) = &creds.bing {
        sources.push(Box::new(BingSource::new(key.clone())));
    }
    if let Some(token) = &creds.apify {
        sources.push(Box::new(ApifySource::new(token.clone())));
    }
    if let Some(key) = &creds.pexels {
        sources.push(Box::new(PexelsSource::new(key.clone())));
    }
    sources
}

/// Maps an HTTP status to the error the session layer reacts to.
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), SourceError> {
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(SourceError::Auth);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimited);
    }
    if !status.is_success() {
        return Err(SourceError::Provider(format!("HTTP {}", status)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_follow_preference_order() {
        let creds = ApiCredentials {
            serpapi: Some("a".into()),
            bing: None,
            apify: Some("c".into()),
            pexels: Some("d".into()),
        };
        let names: Vec<&str> = available_sources(&creds).iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["SerpApi", "Apify", "Pexels"]);
    }

    #[test]
    fn no_credentials_means_no_sources() {
        let creds = ApiCredentials {
            serpapi: None,
            bing: None,
            apify: None,
            pexels: None,
        };
        assert!(available_sources(&creds).is_empty());
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            check_status(reqwest::StatusCode::UNAUTHORIZED),
            Err(SourceError::Auth)
        ));
        assert!(matches!(
            check_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            Err(SourceError::RateLimited)
        ));
        assert!(matches!(
            check_status(reqwest::StatusCode::BAD_GATEWAY),
            Err(SourceError::Provider(_))
        ));
        assert!(check_status(reqwest::StatusCode::OK).is_ok());
    }
}
