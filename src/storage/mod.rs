//! Storage abstractions for ingested transit data.
//!
//! A run's four collections are always written together as one snapshot;
//! readers see either the previous snapshot or the new one, never a mix.
//!
//! ## Snapshot Layout
//!
//! ```text
//! {output_dir}/
//! └── bus_data.json   # { updated_at, summary, routes, directions, stops, links }
//! ```

pub mod local;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{BusData, IngestSummary};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Metadata about a completed save.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    pub summary: IngestSummary,
    /// Where the snapshot was written
    pub location: String,
    pub timestamp: DateTime<Utc>,
}

/// Persisted form of a run's result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusDataSnapshot {
    pub updated_at: DateTime<Utc>,
    pub summary: IngestSummary,
    #[serde(flatten)]
    pub data: BusData,
}

impl BusDataSnapshot {
    pub fn new(data: BusData) -> Self {
        Self {
            updated_at: Utc::now(),
            summary: data.summary(),
            data,
        }
    }
}

/// Trait for bus data storage backends.
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Persist routes, directions, stops, and links as one atomic unit.
    async fn save_bus_data(&self, data: &BusData) -> Result<SaveSummary>;

    /// Load the last saved snapshot, if any.
    async fn load_bus_data(&self) -> Result<Option<BusDataSnapshot>>;
}
