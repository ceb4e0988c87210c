//! Hand-offs parked until a quiet window ends.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::{Deserialize, Serialize};

use herdbell_core::types::{NotificationId, UserId};
use herdbell_entity::notification::{DeliveryChannel, NotificationCategory};

/// An external hand-off suppressed by quiet hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDelivery {
    /// Owner of the notification.
    pub user_id: UserId,
    /// The notification to deliver.
    pub notification_id: NotificationId,
    /// Category whose settings gate the delivery.
    pub category: NotificationCategory,
    /// Target channel.
    pub channel: DeliveryChannel,
    /// When the hand-off was suppressed.
    pub queued_at: DateTime<Utc>,
}

/// Deferred hand-offs, at most one per (notification, channel).
#[derive(Debug, Clone, Default)]
pub struct PendingDeliveries {
    entries: Arc<DashMap<(NotificationId, DeliveryChannel), PendingDelivery>>,
}

impl PendingDeliveries {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `entry`. Returns `false` when the pair is already parked.
    pub fn enqueue(&self, entry: PendingDelivery) -> bool {
        match self.entries.entry((entry.notification_id, entry.channel)) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(entry);
                true
            }
        }
    }

    /// Parked entries of `user_id`, oldest first.
    pub fn for_user(&self, user_id: UserId) -> Vec<PendingDelivery> {
        self.collect(|e| e.user_id == user_id)
    }

    fn collect(&self, filter: impl Fn(&PendingDelivery) -> bool) -> Vec<PendingDelivery> {
        let mut entries: Vec<PendingDelivery> = self
            .entries
            .iter()
            .filter(|e| filter(e.value()))
            .map(|e| e.value().clone())
            .collect();
        entries.sort_by(|a, b| {
            a.queued_at
                .cmp(&b.queued_at)
                .then(a.notification_id.cmp(&b.notification_id))
                .then(a.channel.cmp(&b.channel))
        });
        entries
    }

    /// Remove a pair. Returns `true` when it was parked.
    pub fn remove(&self, notification_id: NotificationId, channel: DeliveryChannel) -> bool {
        self.entries.remove(&(notification_id, channel)).is_some()
    }

    /// Number of parked entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every parked entry, oldest first.
    pub fn export(&self) -> Vec<PendingDelivery> {
        self.collect(|_| true)
    }

    /// Replace the parked entries with `entries`. Duplicate pairs keep the
    /// first occurrence.
    pub fn import(&self, entries: Vec<PendingDelivery>) {
        self.entries.clear();
        for entry in entries {
            self.enqueue(entry);
        }
    }
}
