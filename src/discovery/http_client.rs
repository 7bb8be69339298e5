//! Thin HTTP client for discovery probes.
//!
//! Wraps `reqwest` with a per-request timeout and a stable user agent.
//! Only discovery talks plain HTTP; page audits go through the browser.

use anyhow::{Context, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("prospector/", env!("CARGO_PKG_VERSION"));

/// A fetched response body with its status.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// Whether the response is a usable 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client for sitemap and robots.txt probes.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("building HTTP client")?;
        Ok(Self { client })
    }

    /// GET a URL with the given timeout, returning status and body.
    pub async fn get(&self, url: &str, timeout: Duration) -> Result<FetchResponse> {
        let resp = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("fetching {url}"))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;

        Ok(FetchResponse { status, body })
    }
}
