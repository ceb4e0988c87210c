//! Snapshot provider backed by a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::fs;
use tracing::debug;

use herdbell_core::error::{AppError, ErrorKind};
use herdbell_core::result::AppResult;
use herdbell_entity::herd::{
    BreedingRecord, CalvingRecord, FeedItem, HerdSnapshot, VaccinationRecord,
};

use super::provider::SnapshotProvider;

/// Reads a [`HerdSnapshot`] file on every query, so edits to the file are
/// picked up by the next tick.
#[derive(Debug, Clone)]
pub struct JsonSnapshotProvider {
    path: PathBuf,
}

impl JsonSnapshotProvider {
    /// Read snapshots from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the whole file.
    pub async fn read(&self) -> AppResult<HerdSnapshot> {
        let raw = fs::read(&self.path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::SnapshotUnavailable,
                format!("Failed to read snapshot file: {}", self.path.display()),
                e,
            )
        })?;
        let snapshot: HerdSnapshot = serde_json::from_slice(&raw).map_err(|e| {
            AppError::with_source(
                ErrorKind::SnapshotUnavailable,
                format!("Malformed snapshot file: {}", self.path.display()),
                e,
            )
        })?;
        debug!(path = %self.path.display(), as_of = %snapshot.as_of, "Snapshot read");
        Ok(snapshot)
    }
}

#[async_trait]
impl SnapshotProvider for JsonSnapshotProvider {
    async fn as_of(&self) -> AppResult<NaiveDate> {
        Ok(self.read().await?.as_of)
    }

    async fn feed_stock(&self) -> AppResult<Vec<FeedItem>> {
        Ok(self.read().await?.feed)
    }

    async fn pregnancy_checks(&self) -> AppResult<Vec<BreedingRecord>> {
        Ok(self.read().await?.pregnancy_checks)
    }

    async fn vaccinations(&self) -> AppResult<Vec<VaccinationRecord>> {
        Ok(self.read().await?.vaccinations)
    }

    async fn expected_deliveries(&self) -> AppResult<Vec<CalvingRecord>> {
        Ok(self.read().await?.deliveries)
    }

    async fn inseminations(&self) -> AppResult<Vec<BreedingRecord>> {
        Ok(self.read().await?.inseminations)
    }
}
