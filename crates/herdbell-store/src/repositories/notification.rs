//! Notification lifecycle repository.
//!
//! Records are partitioned per user. Each partition sits behind its own
//! `tokio::sync::Mutex`, so every transition and reconcile step is a
//! read-modify-write on a consistent view of that user's records, and
//! users never contend with each other.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use herdbell_core::error::AppError;
use herdbell_core::result::AppResult;
use herdbell_core::types::{NotificationId, UserId};
use herdbell_entity::notification::{
    EscalationOutcome, Notification, NotificationDraft, NotificationPriority, NotificationStatus,
    Transition,
};

/// What happened when a draft was reconciled against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    /// No open record carried the key or was covered by the draft; a new
    /// `Sent` record was stored.
    Created(Notification),
    /// An open record was replaced in place with a larger or more urgent
    /// entity set.
    Escalated {
        /// The record after escalation.
        notification: Notification,
        /// The stored priority went up.
        priority_raised: bool,
    },
    /// The open record with the same key had its payload details brought up
    /// to date at the same priority.
    Refreshed(Notification),
    /// The open record with the same key already matches the draft.
    Unchanged(NotificationId),
}

impl ReconcileOutcome {
    /// The record a hand-off should be made for, if any.
    ///
    /// New records always qualify; escalations only when they raised the
    /// priority.
    pub fn deliverable(&self) -> Option<&Notification> {
        match self {
            Self::Created(notification) => Some(notification),
            Self::Escalated {
                notification,
                priority_raised: true,
            } => Some(notification),
            _ => None,
        }
    }
}

/// Filters for [`NotificationRepository::history`].
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// Only records created at or after this instant.
    pub since: DateTime<Utc>,
    /// Only records in this status.
    pub status: Option<NotificationStatus>,
    /// Case-insensitive substring of title or message.
    pub search: Option<String>,
}

/// One user's records plus the open-record index.
#[derive(Debug, Default)]
struct UserNotifications {
    records: HashMap<NotificationId, Notification>,
    /// The single non-dismissed record per `dedupe_key`.
    open_by_key: HashMap<String, NotificationId>,
}

impl UserNotifications {
    fn insert(&mut self, record: Notification) {
        if record.status.is_open() {
            self.open_by_key.insert(record.dedupe_key.clone(), record.id);
        }
        self.records.insert(record.id, record);
    }

    fn release_if_closed(&mut self, record: &Notification) {
        if !record.status.is_open() && self.open_by_key.get(&record.dedupe_key) == Some(&record.id) {
            self.open_by_key.remove(&record.dedupe_key);
        }
    }

    /// Newest open record whose entity set the draft strictly contains.
    fn covered_by(&self, draft: &NotificationDraft) -> Option<NotificationId> {
        self.open_by_key
            .values()
            .filter_map(|id| self.records.get(id))
            .filter(|record| record.is_covered_by(draft))
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .map(|record| record.id)
    }

    /// Fold `draft` into the open record `id`, keeping the key index in step.
    fn escalate(
        &mut self,
        user_id: UserId,
        id: NotificationId,
        draft: &NotificationDraft,
        now: DateTime<Utc>,
    ) -> Option<ReconcileOutcome> {
        let record = self.records.get_mut(&id)?;
        let previous_key = record.dedupe_key.clone();
        let outcome = match record.escalate(draft, now) {
            EscalationOutcome::Escalated { priority_raised } => {
                debug!(
                    user_id = %user_id,
                    notification_id = %id,
                    kind = %record.kind,
                    affected = record.data.affected_count(),
                    priority_raised,
                    "Escalated open notification"
                );
                ReconcileOutcome::Escalated {
                    notification: record.clone(),
                    priority_raised,
                }
            }
            EscalationOutcome::Refreshed => ReconcileOutcome::Refreshed(record.clone()),
            EscalationOutcome::Unchanged => ReconcileOutcome::Unchanged(id),
            EscalationOutcome::Rejected => return None,
        };
        if record.dedupe_key != previous_key {
            let key = record.dedupe_key.clone();
            self.open_by_key.remove(&previous_key);
            self.open_by_key.insert(key, id);
        }
        Some(outcome)
    }

    fn newest_first<'a>(&'a self, filter: impl Fn(&Notification) -> bool) -> Vec<Notification> {
        let mut matches: Vec<&'a Notification> =
            self.records.values().filter(|n| filter(n)).collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        matches.into_iter().cloned().collect()
    }
}

/// In-memory store of notification records.
#[derive(Debug, Clone, Default)]
pub struct NotificationRepository {
    users: Arc<DashMap<UserId, Arc<Mutex<UserNotifications>>>>,
}

impl NotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, user_id: UserId) -> Arc<Mutex<UserNotifications>> {
        Arc::clone(self.users.entry(user_id).or_default().value())
    }

    fn existing_slot(&self, user_id: UserId) -> Option<Arc<Mutex<UserNotifications>>> {
        self.users.get(&user_id).map(|entry| Arc::clone(entry.value()))
    }

    fn not_found(id: NotificationId) -> AppError {
        AppError::not_found(format!("Notification {id} not found"))
    }

    /// Reconcile a fresh draft against the user's open records.
    ///
    /// An open record with the same `dedupe_key` is refreshed or escalated.
    /// Otherwise the newest open record of the same type whose entities the
    /// draft strictly contains is escalated in place. Any other draft
    /// creates a new `Sent` record.
    pub async fn reconcile(
        &self,
        user_id: UserId,
        draft: NotificationDraft,
        now: DateTime<Utc>,
    ) -> ReconcileOutcome {
        let slot = self.slot(user_id);
        let mut guard = slot.lock().await;
        let state = &mut *guard;

        if let Some(open_id) = state.open_by_key.get(&draft.dedupe_key).copied() {
            if let Some(outcome) = state.escalate(user_id, open_id, &draft, now) {
                return outcome;
            }
            state.open_by_key.remove(&draft.dedupe_key);
        }
        if let Some(covered_id) = state.covered_by(&draft) {
            if let Some(outcome) = state.escalate(user_id, covered_id, &draft, now) {
                return outcome;
            }
        }

        let record = Notification::from_draft(user_id, draft, now);
        debug!(
            user_id = %user_id,
            notification_id = %record.id,
            kind = %record.kind,
            priority = %record.priority,
            "Created notification"
        );
        state.insert(record.clone());
        ReconcileOutcome::Created(record)
    }

    /// Fetch one record.
    pub async fn get(&self, user_id: UserId, id: NotificationId) -> AppResult<Notification> {
        let slot = self.existing_slot(user_id).ok_or_else(|| Self::not_found(id))?;
        let state = slot.lock().await;
        state
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    async fn modify<F>(
        &self,
        user_id: UserId,
        id: NotificationId,
        op: F,
    ) -> AppResult<(Notification, Transition)>
    where
        F: FnOnce(&mut Notification) -> Transition,
    {
        let slot = self.existing_slot(user_id).ok_or_else(|| Self::not_found(id))?;
        let mut guard = slot.lock().await;
        let state = &mut *guard;

        let record = state.records.get_mut(&id).ok_or_else(|| Self::not_found(id))?;
        let transition = op(record);
        let snapshot = record.clone();
        state.release_if_closed(&snapshot);
        Ok((snapshot, transition))
    }

    /// Mark one record as read.
    pub async fn mark_read(
        &self,
        user_id: UserId,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, Transition)> {
        self.modify(user_id, id, |n| n.mark_read(now)).await
    }

    /// Dismiss one record.
    pub async fn dismiss(
        &self,
        user_id: UserId,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, Transition)> {
        self.modify(user_id, id, |n| n.dismiss(now)).await
    }

    /// Snooze one record until `until`.
    pub async fn snooze(
        &self,
        user_id: UserId,
        id: NotificationId,
        until: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, Transition)> {
        self.modify(user_id, id, |n| n.snooze(until, now)).await
    }

    /// Return a snoozed record to `Sent`.
    pub async fn unsnooze(
        &self,
        user_id: UserId,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, Transition)> {
        self.modify(user_id, id, |n| n.unsnooze(now)).await
    }

    /// Mark every unread record as read. Returns how many changed.
    pub async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> usize {
        let Some(slot) = self.existing_slot(user_id) else {
            return 0;
        };
        let mut state = slot.lock().await;
        state
            .records
            .values_mut()
            .filter(|n| n.is_unread())
            .map(|n| n.mark_read(now))
            .filter(Transition::is_applied)
            .count()
    }

    /// Records in `Sent`, newest first.
    pub async fn list_unread(&self, user_id: UserId) -> Vec<Notification> {
        match self.existing_slot(user_id) {
            Some(slot) => slot.lock().await.newest_first(Notification::is_unread),
            None => Vec::new(),
        }
    }

    /// Number of records in `Sent`.
    pub async fn unread_count(&self, user_id: UserId) -> usize {
        match self.existing_slot(user_id) {
            Some(slot) => slot
                .lock()
                .await
                .records
                .values()
                .filter(|n| n.is_unread())
                .count(),
            None => 0,
        }
    }

    /// Number of unread records with `high` priority.
    pub async fn high_priority_count(&self, user_id: UserId) -> usize {
        match self.existing_slot(user_id) {
            Some(slot) => slot
                .lock()
                .await
                .records
                .values()
                .filter(|n| n.is_unread() && n.priority == NotificationPriority::High)
                .count(),
            None => 0,
        }
    }

    /// Records in any status matching `query`, newest first.
    pub async fn history(&self, user_id: UserId, query: &HistoryQuery) -> Vec<Notification> {
        let Some(slot) = self.existing_slot(user_id) else {
            return Vec::new();
        };
        let state = slot.lock().await;
        state.newest_first(|n| {
            n.created_at >= query.since
                && query.status.is_none_or(|status| n.status == status)
                && query
                    .search
                    .as_deref()
                    .is_none_or(|needle| n.matches_text(needle))
        })
    }

    /// Return every snoozed record whose deadline has passed to `Sent`.
    pub async fn sweep_expired_snoozes(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Vec<Notification> {
        let Some(slot) = self.existing_slot(user_id) else {
            return Vec::new();
        };
        let mut state = slot.lock().await;
        let mut reactivated = Vec::new();
        for record in state.records.values_mut() {
            if record.snooze_expired(now) && record.unsnooze(now).is_applied() {
                debug!(
                    user_id = %user_id,
                    notification_id = %record.id,
                    "Snooze expired"
                );
                reactivated.push(record.clone());
            }
        }
        reactivated
    }

    /// Users that own at least one record.
    pub fn user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.users.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        ids
    }

    /// Copy of every record, grouped by user and oldest first.
    pub async fn export(&self) -> Vec<Notification> {
        let mut all = Vec::new();
        for user_id in self.user_ids() {
            if let Some(slot) = self.existing_slot(user_id) {
                let state = slot.lock().await;
                let mut records: Vec<Notification> = state.records.values().cloned().collect();
                records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
                all.extend(records);
            }
        }
        all
    }

    /// Replace the contents of the repository with `records`.
    ///
    /// When several open records share a key, the newest one is indexed.
    pub async fn import(&self, mut records: Vec<Notification>) {
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        self.users.clear();
        for record in records {
            let slot = self.slot(record.user_id);
            slot.lock().await.insert(record);
        }
    }
}
