//! Fixtures shared by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{BusData, ProgressEvent, SourceConfig};
use crate::pipeline::ProgressSink;
use crate::services::PageFetcher;
use crate::storage::{BusDataSnapshot, DataStore, SaveSummary};

pub const BASE_URL: &str = "http://transit.test/";

pub fn source_config() -> SourceConfig {
    SourceConfig {
        base_url: BASE_URL.to_string(),
        ..SourceConfig::default()
    }
}

/// Listing page with one marker anchor per `(id, title)`, hrefs ending in `{key}={id}`.
pub fn listing(key: &str, items: &[(&str, &str)]) -> String {
    let anchors: String = items
        .iter()
        .map(|(id, title)| {
            format!(
                r#"<li><a class="ada" title="{title}" href="webwatch/ada.aspx?{key}={id}">{title}</a></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><a href="index.html">Home</a><ul>{anchors}</ul></body></html>"#
    )
}

/// Serves pages from memory; unknown URLs fail like a 404.
#[derive(Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, path: &str, html: &str) -> Self {
        self.pages.insert(format!("{BASE_URL}{path}"), html.to_string());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::transport(url, "404 Not Found"))
    }
}

/// Records every event it receives.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn update(&self, event: ProgressEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Store whose saves always fail.
pub struct FailingStorage;

#[async_trait]
impl DataStore for FailingStorage {
    async fn save_bus_data(&self, _data: &BusData) -> Result<SaveSummary> {
        Err(AppError::persistence("disk full"))
    }

    async fn load_bus_data(&self) -> Result<Option<BusDataSnapshot>> {
        Ok(None)
    }
}
