//! Local filesystem storage implementation.
//!
//! The snapshot is written to a temp file and renamed over the previous one,
//! so a crash mid-write leaves the old snapshot intact.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{BusData, StorageConfig};
use crate::storage::{BusDataSnapshot, DataStore, SaveSummary};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
    snapshot_file: String,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>, snapshot_file: impl Into<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            snapshot_file: snapshot_file.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.output_path(), config.snapshot_file.clone())
    }

    /// Full path of the snapshot file.
    pub fn snapshot_path(&self) -> PathBuf {
        self.root_dir.join(&self.snapshot_file)
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, path: &PathBuf, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, path).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, path: &PathBuf) -> std::io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl DataStore for LocalStorage {
    async fn save_bus_data(&self, data: &BusData) -> Result<SaveSummary> {
        let snapshot = BusDataSnapshot::new(data.clone());
        let bytes = serde_json::to_vec_pretty(&snapshot).map_err(AppError::persistence)?;
        let path = self.snapshot_path();

        self.write_bytes(&path, &bytes)
            .await
            .map_err(|e| AppError::persistence(format!("{}: {}", path.display(), e)))?;

        log::info!(
            "Saved {} to {}",
            snapshot.summary,
            path.display()
        );

        Ok(SaveSummary {
            summary: snapshot.summary,
            location: path.display().to_string(),
            timestamp: Utc::now(),
        })
    }

    async fn load_bus_data(&self) -> Result<Option<BusDataSnapshot>> {
        let path = self.snapshot_path();
        let bytes = self
            .read_bytes(&path)
            .await
            .map_err(|e| AppError::persistence(format!("{}: {}", path.display(), e)))?;

        match bytes {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => {
                log::warn!("No snapshot found at {}", path.display());
                Ok(None)
            }
        }
    }
}
