//! Snapshot provider abstraction.

use async_trait::async_trait;
use chrono::NaiveDate;

use herdbell_core::result::AppResult;
use herdbell_entity::herd::{BreedingRecord, CalvingRecord, FeedItem, VaccinationRecord};

/// Read-only access to the domain stores.
///
/// Each detector issues exactly one query. A failing query must return a
/// `SnapshotUnavailable` error; the tick then skips only that detector.
#[async_trait]
pub trait SnapshotProvider: Send + Sync + std::fmt::Debug + 'static {
    /// The calendar date due dates are measured against.
    async fn as_of(&self) -> AppResult<NaiveDate>;

    /// Current feed stock levels.
    async fn feed_stock(&self) -> AppResult<Vec<FeedItem>>;

    /// Pending pregnancy-diagnosis checks.
    async fn pregnancy_checks(&self) -> AppResult<Vec<BreedingRecord>>;

    /// Scheduled vaccinations.
    async fn vaccinations(&self) -> AppResult<Vec<VaccinationRecord>>;

    /// Expected calvings.
    async fn expected_deliveries(&self) -> AppResult<Vec<CalvingRecord>>;

    /// Scheduled inseminations.
    async fn inseminations(&self) -> AppResult<Vec<BreedingRecord>>;
}
