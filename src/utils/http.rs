// src/utils/http.rs

//! HTTP client construction.

use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;

/// Create the shared HTTP client.
///
/// One client is built at startup and cloned into the extractors and
/// the notifier, so every request in a cycle goes through the same
/// connection pool and carries the same timeout.
pub fn create_client(config: &CrawlerConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| AppError::config(format!("failed to build HTTP client: {e}")))
}

/// Fetch a page body, mapping transport and status failures to
/// [`AppError::Network`].
///
/// No retry happens here; a failed page is retried naturally on the
/// next scheduled cycle.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::network(url, e))?
        .error_for_status()
        .map_err(|e| AppError::network(url, e))?;

    response.text().await.map_err(|e| AppError::network(url, e))
}
