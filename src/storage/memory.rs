//! In-memory storage backend.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::BusData;
use crate::storage::{BusDataSnapshot, DataStore, SaveSummary};

/// Keeps the last snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<BusDataSnapshot>>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }

    /// The last saved data.
    pub fn data(&self) -> Option<BusData> {
        self.snapshot
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.data.clone()))
    }
}

#[async_trait]
impl DataStore for MemoryStorage {
    async fn save_bus_data(&self, data: &BusData) -> Result<SaveSummary> {
        let snapshot = BusDataSnapshot::new(data.clone());
        let summary = snapshot.summary;

        let mut slot = self
            .snapshot
            .lock()
            .map_err(|e| AppError::persistence(e.to_string()))?;
        *slot = Some(snapshot);
        drop(slot);

        if let Ok(mut saves) = self.saves.lock() {
            *saves += 1;
        }

        Ok(SaveSummary {
            summary,
            location: "memory".to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn load_bus_data(&self) -> Result<Option<BusDataSnapshot>> {
        let slot = self
            .snapshot
            .lock()
            .map_err(|e| AppError::persistence(e.to_string()))?;
        Ok(slot.clone())
    }
}
