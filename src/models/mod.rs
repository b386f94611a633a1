// src/models/mod.rs

//! Domain models for the transit crawler.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod bus_data;
mod config;
mod progress;
mod transit;

// Re-export all public types
pub use bus_data::{BusData, IngestSummary};
pub use config::{
    Config, CrawlerConfig, DIRECTION_PLACEHOLDER, ROUTE_PLACEHOLDER, SourceConfig, StorageConfig,
    compile_id_pattern,
};
pub use progress::{ERROR_PERCENT, ProgressEvent, Stage};
pub use transit::{Direction, Route, RouteStopLink, Stop};
