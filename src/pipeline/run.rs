// src/pipeline/run.rs

//! Ingestion wired from configuration.

use chrono::Utc;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::{Ingestor, ProgressSink, RunReport};
use crate::services::{HttpFetcher, TransitLoader};
use crate::storage::LocalStorage;

/// Build an HTTP-backed ingestor that saves to local storage.
pub fn build_ingestor(config: &Config) -> Result<Ingestor<HttpFetcher, LocalStorage>> {
    config.validate()?;

    let fetcher = HttpFetcher::new(&config.crawler)?;
    let loader = TransitLoader::new(fetcher, &config.source)?;
    let storage = LocalStorage::from_config(&config.storage);

    Ok(Ingestor::new(loader, storage).with_concurrency(config.crawler.max_concurrent))
}

/// Run one ingestion from `config`, reporting to `sink`.
pub async fn run_ingest(config: &Config, sink: &dyn ProgressSink) -> Result<RunReport> {
    let start_time = Utc::now();
    let ingestor = build_ingestor(config)?;

    log::info!("Ingesting transit data from {}", config.source.base_url);
    let report = ingestor.run(sink).await.into_result()?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Ingestion finished in {}.{:03}s",
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000
    );

    Ok(report)
}
