//! Structured notification payloads.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A feed item below its minimum stock level, as stored in a notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItemSummary {
    /// Feed item identifier in the stock store.
    pub id: String,
    /// Display name (e.g. "Silage").
    pub name: String,
    /// Stock on hand at detection time.
    pub current_stock: f64,
    /// Threshold configured for the item.
    pub minimum_stock_level: f64,
    /// Unit of measure, if the stock store provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl FeedItemSummary {
    /// How far the stock is below its minimum (zero when exactly at it).
    pub fn deficit(&self) -> f64 {
        (self.minimum_stock_level - self.current_stock).max(0.0)
    }

    /// Stock is under half of the minimum level.
    pub fn is_critical(&self) -> bool {
        self.deficit() * 2.0 > self.minimum_stock_level
    }
}

/// An animal with a due or overdue event, as stored in a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CowSummary {
    /// Animal identifier in the herd register.
    pub cow_id: String,
    /// Ear tag / herd number shown to users.
    pub cow_no: String,
    /// Date the event is due (PD, vaccination, delivery, insemination).
    pub due_date: NaiveDate,
    /// Whole days from the detection date to `due_date`; negative when overdue.
    pub days_remaining: i64,
    /// `days_remaining < 0`.
    pub overdue: bool,
    /// Vaccine name for vaccination reminders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vaccine: Option<String>,
}

impl CowSummary {
    /// Identity of the affected entity. Vaccination reminders pair the
    /// animal with the vaccine, since one cow can be due for several.
    pub fn entity_id(&self) -> String {
        match &self.vaccine {
            Some(vaccine) => format!("{}/{}", self.cow_id, vaccine.to_lowercase()),
            None => self.cow_id.clone(),
        }
    }
}

/// Type-specific payload of a notification.
///
/// Serialized as `{"items": [...]}` for feed notifications and
/// `{"cows": [...]}` for every cattle notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NotificationData {
    /// Feed items at or below their minimum stock level.
    Items {
        /// Affected feed items, most depleted first.
        items: Vec<FeedItemSummary>,
    },
    /// Animals with an upcoming or overdue event.
    Cows {
        /// Affected animals, most urgent first.
        cows: Vec<CowSummary>,
    },
}

impl NotificationData {
    /// Number of affected entities in the payload.
    pub fn affected_count(&self) -> usize {
        match self {
            Self::Items { items } => items.len(),
            Self::Cows { cows } => cows.len(),
        }
    }

    /// Identifiers of the affected entities, in payload order.
    pub fn entity_ids(&self) -> Vec<String> {
        match self {
            Self::Items { items } => items.iter().map(|i| i.id.clone()).collect(),
            Self::Cows { cows } => cows.iter().map(CowSummary::entity_id).collect(),
        }
    }

    /// Every entity of `other` is also affected here, plus at least one more.
    pub fn is_strict_superset_of(&self, other: &NotificationData) -> bool {
        let ours: BTreeSet<String> = self.entity_ids().into_iter().collect();
        let theirs: BTreeSet<String> = other.entity_ids().into_iter().collect();
        ours.len() > theirs.len() && ours.is_superset(&theirs)
    }
}
