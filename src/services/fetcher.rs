// src/services/fetcher.rs

//! Page fetching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::CrawlerConfig;
use crate::utils::http::{create_async_client, fetch_page_async};

/// Source of raw HTML pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET a page and return its body. One request per call, no retries.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Fetches pages over HTTP.
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            client: create_async_client(config)?,
            delay: Duration::from_millis(config.request_delay_ms),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        log::debug!("GET {}", url);
        let body = fetch_page_async(&self.client, url).await?;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(body)
    }
}
