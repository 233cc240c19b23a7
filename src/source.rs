//! Content sources: where rendered trending-page markup comes from.
//!
//! The extraction pipeline only needs opaque page text per region, so
//! the seam is a small async trait. `HttpSource` is the production
//! implementation; tests substitute in-memory sources.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

use crate::config::HttpConfig;
use crate::region::Region;

/// Response bodies are truncated at this size during streaming reads.
/// Trending pages are well under 1 MB; anything larger is runaway
/// markup we do not want in memory.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Supplies rendered page content for a region.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, region: &Region) -> Result<String>;
}

/// Fetches the trending page over plain HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    url_template: String,
}

impl HttpSource {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            url_template: config.url_template.clone(),
        })
    }

    /// The page URL for a region, from the configured template.
    pub fn url_for(&self, region: &Region) -> String {
        self.url_template.replace("{code}", region.code)
    }
}

#[async_trait]
impl ContentSource for HttpSource {
    async fn fetch(&self, region: &Region) -> Result<String> {
        let url = self.url_for(region);
        debug!(region = region.code, url = %url, "fetching trending page");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request failed for {}", region.code))?;

        let status = response.status();
        if !status.is_success() {
            bail!("Unexpected status {} for {}", status, region.code);
        }

        read_body_capped(response, MAX_BODY_BYTES).await
    }
}

/// Read a response body in chunks, stopping at `max_bytes` so an
/// oversized response cannot exhaust memory. Truncation at a multi-byte
/// boundary degrades to lossy UTF-8.
async fn read_body_capped(response: reqwest::Response, max_bytes: usize) -> Result<String> {
    let mut body = Vec::with_capacity(max_bytes.min(256 * 1024));
    let mut stream = response.bytes_stream();
    let mut total = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Stream read error")?;
        let remaining = max_bytes.saturating_sub(total);
        if remaining == 0 {
            debug!("response truncated at {} bytes", total);
            break;
        }
        let take = chunk.len().min(remaining);
        body.extend_from_slice(&chunk[..take]);
        total += take;
    }

    Ok(String::from_utf8_lossy(&body).into_owned())
}
