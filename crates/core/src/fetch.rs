//! Content fetching from URLs, files, and stdin.
//!
//! This module provides functions for retrieving HTML content from
//! various sources: HTTP/HTTPS URLs, local files, and standard input.

use std::fs;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
use url::Url;

use crate::{GleanError, Result};

/// Desktop browser User-Agent sent with every request.
///
/// Many publishers reject requests that identify as a bot or carry the
/// HTTP client's default agent.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client configuration for fetching web pages.
///
/// This struct controls timeout and user agent settings for HTTP requests.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent string.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: BROWSER_USER_AGENT.to_string() }
    }
}

/// Checks that `url` is a usable absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(GleanError::InvalidInput("URL is required".to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| GleanError::InvalidInput(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(GleanError::InvalidInput(format!(
            "unsupported scheme '{other}', URL must use http:// or https://"
        ))),
    }
}

/// Fetches HTML content from a URL.
///
/// This function performs an HTTP GET request and returns the response body as text.
/// It follows redirects, respects the configured timeout, and sends a browser
/// User-Agent. Any non-2xx status is reported as [`GleanError::FetchFailed`].
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = validate_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .build()
        .map_err(|e| GleanError::FetchFailed { reason: e.to_string() })?;

    let response = client
        .get(parsed_url)
        .header("User-Agent", &config.user_agent)
        .header(
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        )
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| transport_error(e, config.timeout))?;

    let status = response.status();
    if !status.is_success() {
        tracing::debug!(%url, %status, "upstream returned an error status");
        return Err(GleanError::FetchFailed { reason: status.to_string() });
    }

    let content = response.text().await.map_err(|e| transport_error(e, config.timeout))?;
    tracing::debug!(%url, bytes = content.len(), "fetched page");

    Ok(content)
}

#[cfg(feature = "fetch")]
fn transport_error(err: reqwest::Error, timeout: u64) -> GleanError {
    if err.is_timeout() {
        GleanError::FetchFailed { reason: format!("request timed out after {timeout} seconds") }
    } else {
        GleanError::FetchFailed { reason: err.to_string() }
    }
}

/// Reads HTML content from a local file.
///
/// Callers should validate and sanitize the path when accepting user input.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        Err(GleanError::FileNotFound(path_buf))
    } else {
        fs::read_to_string(&path_buf).map_err(GleanError::from)
    }
}

/// Reads HTML content from standard input.
///
/// This function reads all available input from stdin until EOF.
pub fn fetch_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(GleanError::from)?;

    Ok(buffer)
}
