//! Service layer for the transit crawler.
//!
//! This module contains the scraping logic:
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Anchor extraction (`LinkExtractor`)
//! - Route/direction/stop page loading (`TransitLoader`)

mod extractor;
mod fetcher;
mod loaders;

pub use extractor::{Link, LinkExtractor, UNRECOGNIZED_URL};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use loaders::TransitLoader;
