//! HTTP fetching for the template catalog and archive.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response};
use std::io::Write;
use std::time::Duration;

use crate::error::ScaffoldError;

/// Per-request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can stream a URL into a writer.
///
/// The archive fetcher depends on this rather than on [`HttpFetcher`]
/// directly so that transient failures can be simulated.
pub trait Download {
    /// Write the body at `url` into `dest`, returning the byte count.
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64>;
}

/// Fetches over HTTP/HTTPS.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Create a new HTTP fetcher with a 30-second timeout.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("create-tigris-app/", env!("CARGO_PKG_VERSION")))
            .timeout(TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    /// Fetch a URL as text.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json, application/json");
        let response = checked(url, request.send())?;

        Ok(response.text()?)
    }
}

/// Turn transport failures and non-2xx statuses into [`ScaffoldError::Download`].
fn checked(url: &str, sent: reqwest::Result<Response>) -> std::result::Result<Response, ScaffoldError> {
    let failed = |message: String| ScaffoldError::Download {
        url: url.to_string(),
        message,
    };

    let response = sent.map_err(|e| failed(e.to_string()))?;
    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }
    Ok(response)
}

impl Download for HttpFetcher {
    fn download(&self, url: &str, dest: &mut dyn Write) -> Result<u64> {
        let mut response = checked(url, self.client.get(url).send())?;

        let mut writer = dest;
        let bytes = response
            .copy_to(&mut writer)
            .with_context(|| format!("Failed to read body of {}", url))?;

        Ok(bytes)
    }
}
