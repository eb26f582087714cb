//! Downloading and validating individual images.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

/// Files smaller than this are icons, tracking pixels or error pages.
pub const MIN_IMAGE_BYTES: u64 = 5_000;
/// Files larger than this are not worth storing for 64x64 training input.
pub const MAX_IMAGE_BYTES: u64 = 50_000_000;

pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
}

/// A response whose declared type does not contain "image" is rejected
/// before we write a byte. No header at all is rejected too; a server that
/// will not say what it is serving does not get the benefit of the doubt.
pub fn content_type_is_image(content_type: Option<&str>) -> bool {
    content_type
        .map(|value| value.to_ascii_lowercase().contains("image"))
        .unwrap_or(false)
}

pub fn size_is_plausible(bytes: u64) -> bool {
    bytes > MIN_IMAGE_BYTES && bytes < MAX_IMAGE_BYTES
}

/// Fetches `url` into `dest`. Returns Ok(true) when the file was kept,
/// Ok(false) when the candidate was rejected, Err only on filesystem trouble.
pub fn download_image(client: &Client, url: &str, dest: &Path) -> std::io::Result<bool> {
    let response = match client.get(url).send() {
        Ok(r) => r,
        Err(err) => {
            debug!(%url, %err, "request failed");
            return Ok(false);
        }
    };
    if !response.status().is_success() {
        debug!(%url, status = %response.status(), "non-success status");
        return Ok(false);
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    if !content_type_is_image(content_type.as_deref()) {
        debug!(%url, content_type = content_type.as_deref().unwrap_or(""), "not an image");
        return Ok(false);
    }

    let body = match response.bytes() {
        Ok(b) => b,
        Err(err) => {
            debug!(%url, %err, "body read failed");
            return Ok(false);
        }
    };

    let mut file = File::create(dest)?;
    file.write_all(&body)?;
    drop(file);

    if !size_is_plausible(body.len() as u64) {
        fs::remove_file(dest)?;
        debug!(%url, bytes = body.len(), "implausible size, removed");
        return Ok(false);
    }
    Ok(true)
}
