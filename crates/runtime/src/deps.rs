//! Capability traits for testability
//!
//! Everything the CLI shows to the user, reads from the user, or fetches over
//! the network goes through one of these traits, so tests can substitute
//! capture and scripted implementations for the real console and network.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Destination for text produced by the CLI.
///
/// Implementations must serialize access internally: each call is one atomic
/// hand-off, and concurrent callers must never observe interleaved writes.
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Deliver one unit of text, already wrapped and terminated
    async fn handle_output_line(&self, text: &str) -> Result<()>;
}

/// Source of lines typed by the user.
///
/// Implementations must serialize access internally, in the same way as
/// [`OutputHandler`].
#[async_trait]
pub trait InputProvider: Send + Sync {
    /// Read the next line, or `None` once input is exhausted
    async fn read_line(&self) -> Result<Option<String>>;
}

/// Network operations used by the CLI
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Fetch the body of a URL as raw bytes
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;

    /// Fetch the body of a URL as text
    async fn get_text(&self, url: &str) -> Result<String>;
}

/// Production HTTP client backed by reqwest
#[derive(Clone)]
pub struct RealHttpClient {
    client: reqwest::Client,
}

impl RealHttpClient {
    /// Create a client that identifies itself with `user_agent`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send request to {}: {}", url, e))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Request to {} failed with status {}", url, status);
        }

        Ok(response)
    }
}

#[async_trait]
impl HttpClient for RealHttpClient {
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;
        Ok(bytes.to_vec())
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))
    }
}
