//! Snapshot provider over an in-memory [`HerdSnapshot`].

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use herdbell_core::result::AppResult;
use herdbell_entity::herd::{
    BreedingRecord, CalvingRecord, FeedItem, HerdSnapshot, VaccinationRecord,
};

use super::provider::SnapshotProvider;

/// Serves a fixed snapshot that can be swapped between ticks.
#[derive(Debug)]
pub struct StaticSnapshotProvider {
    snapshot: RwLock<HerdSnapshot>,
}

impl StaticSnapshotProvider {
    /// Serve `snapshot`.
    pub fn new(snapshot: HerdSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Replace the served snapshot.
    pub async fn replace(&self, snapshot: HerdSnapshot) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl SnapshotProvider for StaticSnapshotProvider {
    async fn as_of(&self) -> AppResult<NaiveDate> {
        Ok(self.snapshot.read().await.as_of)
    }

    async fn feed_stock(&self) -> AppResult<Vec<FeedItem>> {
        Ok(self.snapshot.read().await.feed.clone())
    }

    async fn pregnancy_checks(&self) -> AppResult<Vec<BreedingRecord>> {
        Ok(self.snapshot.read().await.pregnancy_checks.clone())
    }

    async fn vaccinations(&self) -> AppResult<Vec<VaccinationRecord>> {
        Ok(self.snapshot.read().await.vaccinations.clone())
    }

    async fn expected_deliveries(&self) -> AppResult<Vec<CalvingRecord>> {
        Ok(self.snapshot.read().await.deliveries.clone())
    }

    async fn inseminations(&self) -> AppResult<Vec<BreedingRecord>> {
        Ok(self.snapshot.read().await.inseminations.clone())
    }
}
