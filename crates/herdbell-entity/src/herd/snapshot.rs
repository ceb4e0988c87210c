//! Point-in-time view of every fact the detectors read.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cattle::{BreedingRecord, CalvingRecord, VaccinationRecord};
use super::feed::FeedItem;

/// All domain facts as of one calendar date.
///
/// This is also the on-disk format of snapshot files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HerdSnapshot {
    /// Date every due-date comparison is made against.
    pub as_of: NaiveDate,
    /// Feed stock levels.
    #[serde(default)]
    pub feed: Vec<FeedItem>,
    /// Pending pregnancy-diagnosis checks.
    #[serde(default)]
    pub pregnancy_checks: Vec<BreedingRecord>,
    /// Scheduled vaccinations.
    #[serde(default)]
    pub vaccinations: Vec<VaccinationRecord>,
    /// Expected calvings.
    #[serde(default)]
    pub deliveries: Vec<CalvingRecord>,
    /// Scheduled inseminations.
    #[serde(default)]
    pub inseminations: Vec<BreedingRecord>,
}

impl HerdSnapshot {
    /// An empty snapshot for `as_of`.
    pub fn empty(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            feed: Vec::new(),
            pregnancy_checks: Vec::new(),
            vaccinations: Vec::new(),
            deliveries: Vec::new(),
            inseminations: Vec::new(),
        }
    }
}
