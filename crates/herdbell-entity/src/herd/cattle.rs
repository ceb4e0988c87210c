//! Cattle event facts: breeding, vaccination, and calving.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A breeding event with a follow-up date.
///
/// Used both for pregnancy diagnosis (PD) checks and for insemination
/// schedules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingRecord {
    /// Animal identifier.
    pub cow_id: String,
    /// Ear tag / herd number.
    pub cow_no: String,
    /// Date the follow-up is due.
    pub due_date: NaiveDate,
}

/// A scheduled vaccination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationRecord {
    /// Animal identifier.
    pub cow_id: String,
    /// Ear tag / herd number.
    pub cow_no: String,
    /// Vaccine to administer.
    pub vaccine: String,
    /// Date the dose is due.
    pub due_date: NaiveDate,
}

/// A pregnant animal with its expected calving date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalvingRecord {
    /// Animal identifier.
    pub cow_id: String,
    /// Ear tag / herd number.
    pub cow_no: String,
    /// Expected delivery date.
    pub expected_delivery: NaiveDate,
}
