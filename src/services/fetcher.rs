// src/services/fetcher.rs

//! Page fetching service.
//!
//! Retrieves the monitored page over HTTP. The only side effect is the
//! network read; every failure aborts the run before any store mutation.

use std::time::Duration;

use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::MonitorConfig;

/// Service for fetching the monitored page.
pub struct PageFetcher {
    url: String,
    client: Client,
}

impl PageFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: &MonitorConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::config(format!("HTTP client build failed: {e}")))?;

        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }

    /// The URL this fetcher targets.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the page body as retrieved at call time.
    ///
    /// Non-success HTTP statuses are errors, classified together with
    /// timeouts and connection failures into `AppError::Fetch`.
    pub async fn fetch(&self) -> Result<String> {
        log::debug!("GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::from_fetch(&self.url, &e))?
            .error_for_status()
            .map_err(|e| AppError::from_fetch(&self.url, &e))?;

        response
            .text()
            .await
            .map_err(|e| AppError::from_fetch(&self.url, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_default_config() {
        let fetcher = PageFetcher::new(&MonitorConfig::default()).unwrap();
        assert!(fetcher.url().starts_with("https://"));
    }
}
