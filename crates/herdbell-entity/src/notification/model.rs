//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use herdbell_core::types::{NotificationId, UserId};

use super::category::NotificationCategory;
use super::kind::NotificationType;
use super::payload::NotificationData;
use super::priority::NotificationPriority;
use super::status::NotificationStatus;

/// A grouped, prioritized notification that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationDraft {
    /// Condition type.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Generated title.
    pub title: String,
    /// Generated message; embeds the affected-entity count.
    pub message: String,
    /// Affected entities.
    pub data: NotificationData,
    /// Worst-case priority across the affected entities.
    pub priority: NotificationPriority,
    /// `<type>:<sorted entity ids>`.
    pub dedupe_key: String,
}

impl NotificationDraft {
    /// Category derived from the type.
    pub fn category(&self) -> NotificationCategory {
        self.kind.category()
    }

    /// More than one affected entity.
    pub fn is_grouped(&self) -> bool {
        self.data.affected_count() > 1
    }
}

/// A notification record owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// The user this record belongs to.
    pub user_id: UserId,
    /// Condition type.
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Category derived from the type.
    pub category: NotificationCategory,
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub message: String,
    /// Structured payload.
    pub data: NotificationData,
    /// Priority level.
    pub priority: NotificationPriority,
    /// Deterministic identity of the affected-entity set.
    pub dedupe_key: String,
    /// Lifecycle state.
    pub status: NotificationStatus,
    /// `data` holds more than one affected entity.
    pub is_grouped: bool,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last mutated.
    pub updated_at: DateTime<Utc>,
    /// First time the record was read. Never cleared.
    pub read_at: Option<DateTime<Utc>>,
    /// When the record was dismissed.
    pub dismissed_at: Option<DateTime<Utc>>,
    /// Set exactly while `status == Snoozed`.
    pub snoozed_until: Option<DateTime<Utc>>,
    /// Incremented on every mutation.
    pub version: u64,
}

impl Notification {
    /// Create a fresh `Sent` record from a draft.
    pub fn from_draft(user_id: UserId, draft: NotificationDraft, now: DateTime<Utc>) -> Self {
        let is_grouped = draft.is_grouped();
        Self {
            id: NotificationId::new(),
            user_id,
            category: draft.kind.category(),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            data: draft.data,
            priority: draft.priority,
            dedupe_key: draft.dedupe_key,
            status: NotificationStatus::Sent,
            is_grouped,
            created_at: now,
            updated_at: now,
            read_at: None,
            dismissed_at: None,
            snoozed_until: None,
            version: 1,
        }
    }

    /// Check if the notification shows in the unread list.
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Sent
    }

    /// Case-insensitive substring match on title or message.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.message.to_lowercase().contains(&needle)
    }
}
