//! HTTP fetching for page analysis.
//!
//! A browser-like user agent keeps bot-hostile servers from returning
//! stripped-down markup. TLS verification is on by default; the developer
//! override exists for local sites with self-signed certificates.

use anyhow::Context;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::{AppError, Result};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetch settings. `dev_mode` disables TLS verification for local testing
/// against self-signed hosts; never enable it in production.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct FetchConfig {
    #[serde(default)]
    pub dev_mode: bool,
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub status: u16,
}

pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(BROWSER_USER_AGENT);

        if config.dev_mode {
            log::warn!("[FETCH] dev mode: TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch the raw HTML for a URL. Transport failures (DNS, timeout,
    /// connection reset) surface as `NetworkError`; HTTP error statuses are
    /// returned to the caller to decide on.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| AppError::network(format!("{}: {}", url, e)))?;

        let status = response.status().as_u16();
        let html = response
            .text()
            .await
            .map_err(|e| AppError::network(format!("{}: {}", url, e)))?;

        log::debug!("[FETCH] {} -> {} ({} bytes)", url, status, html.len());

        Ok(FetchedPage { html, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn test_fetch_returns_body_and_status() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body><h1>Hi</h1></body></html>")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();

        assert_eq!(page.status, 200);
        assert!(page.html.contains("<h1>Hi</h1>"));
    }

    #[tokio::test]
    async fn test_fetch_sends_browser_user_agent() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/ua")
            .match_header("user-agent", BROWSER_USER_AGENT)
            .with_status(200)
            .with_body("ok")
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/ua", server.url())).unwrap();
        fetcher.fetch(&url).await.unwrap();

        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_error_statuses_are_reported() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let fetcher = PageFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let page = fetcher.fetch(&url).await.unwrap();
        assert_eq!(page.status, 404);
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        // Nothing listens on this port
        let fetcher = PageFetcher::new(&FetchConfig::default()).unwrap();
        let url = Url::parse("http://127.0.0.1:9/down").unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(err, AppError::NetworkError(_)));
    }
}
