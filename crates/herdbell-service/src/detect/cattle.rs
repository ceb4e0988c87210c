//! Due-soon detectors for breeding, vaccination, and calving events.
//!
//! An event triggers when `due_date - as_of` (whole days) is at most the
//! look-ahead window. Overdue events (negative days) always trigger.

use chrono::NaiveDate;

use herdbell_entity::herd::{BreedingRecord, CalvingRecord, VaccinationRecord};
use herdbell_entity::notification::{CowSummary, NotificationType};

use super::candidate::{AffectedEntity, Candidate};

/// Whole days from `as_of` to `due_date`; negative when overdue.
pub fn days_remaining(due_date: NaiveDate, as_of: NaiveDate) -> i64 {
    (due_date - as_of).num_days()
}

fn due_candidate(
    kind: NotificationType,
    cow_id: &str,
    cow_no: &str,
    due_date: NaiveDate,
    vaccine: Option<&str>,
    as_of: NaiveDate,
    window_days: i64,
) -> Option<Candidate> {
    let days = days_remaining(due_date, as_of);
    (days <= window_days).then(|| Candidate {
        kind,
        entity: AffectedEntity::Cow(CowSummary {
            cow_id: cow_id.to_string(),
            cow_no: cow_no.to_string(),
            due_date,
            days_remaining: days,
            overdue: days < 0,
            vaccine: vaccine.map(str::to_string),
        }),
    })
}

fn breeding_due(
    kind: NotificationType,
    records: &[BreedingRecord],
    as_of: NaiveDate,
    window_days: i64,
) -> Vec<Candidate> {
    records
        .iter()
        .filter_map(|r| due_candidate(kind, &r.cow_id, &r.cow_no, r.due_date, None, as_of, window_days))
        .collect()
}

/// Pregnancy diagnosis checks due within the window.
pub fn detect_pd_due(records: &[BreedingRecord], as_of: NaiveDate, window_days: i64) -> Vec<Candidate> {
    breeding_due(NotificationType::PdDue, records, as_of, window_days)
}

/// Inseminations due within the window.
pub fn detect_ai_due(records: &[BreedingRecord], as_of: NaiveDate, window_days: i64) -> Vec<Candidate> {
    breeding_due(NotificationType::AiDue, records, as_of, window_days)
}

/// Vaccinations due within the window.
pub fn detect_vaccination_due(
    records: &[VaccinationRecord],
    as_of: NaiveDate,
    window_days: i64,
) -> Vec<Candidate> {
    records
        .iter()
        .filter_map(|r| {
            due_candidate(
                NotificationType::VaccinationDue,
                &r.cow_id,
                &r.cow_no,
                r.due_date,
                Some(r.vaccine.as_str()),
                as_of,
                window_days,
            )
        })
        .collect()
}

/// Calvings expected within the window.
pub fn detect_delivery_due(
    records: &[CalvingRecord],
    as_of: NaiveDate,
    window_days: i64,
) -> Vec<Candidate> {
    records
        .iter()
        .filter_map(|r| {
            due_candidate(
                NotificationType::DeliveryDue,
                &r.cow_id,
                &r.cow_no,
                r.expected_delivery,
                None,
                as_of,
                window_days,
            )
        })
        .collect()
}
