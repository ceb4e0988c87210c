//! Lifecycle state machine for notification records.
//!
//! ```text
//!            mark_read                 dismiss
//!   Sent ─────────────► Read ───────────────────► Dismissed
//!    │ ▲                  │                          ▲
//!    │ │ unsnooze/expiry  │ snooze                   │
//!    ▼ │                  ▼                          │
//!   Snoozed ◄─────────────┘ ─────────────────────────┘
//! ```
//!
//! Every method is a pure read-modify-write on one record; callers hold the
//! owning user's lock while invoking them. `snoozed_until` is set exactly
//! while the status is `Snoozed`, and `read_at` is never cleared.

use chrono::{DateTime, Utc};

use super::model::{Notification, NotificationDraft};
use super::status::NotificationStatus;

/// Result of a user-driven transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The record changed.
    Applied,
    /// The record was already in the requested state, or the transition
    /// does not apply from its current state.
    Unchanged,
}

impl Transition {
    /// Whether the record changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of reconciling a fresh draft against an open record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationOutcome {
    /// Payload replaced in place by a larger or more urgent one.
    Escalated {
        /// The stored priority went up.
        priority_raised: bool,
    },
    /// Same entity set at the same priority; only the payload details
    /// (day counts, stock levels) were brought up to date.
    Refreshed,
    /// The draft does not apply to this record, or changes nothing.
    Unchanged,
    /// The record was dismissed before the escalation was applied.
    Rejected,
}

impl Notification {
    /// `Sent`/`Snoozed` → `Read`. Idempotent on `Read`; ignored on `Dismissed`.
    pub fn mark_read(&mut self, now: DateTime<Utc>) -> Transition {
        match self.status {
            NotificationStatus::Sent | NotificationStatus::Snoozed => {
                self.status = NotificationStatus::Read;
                self.snoozed_until = None;
                if self.read_at.is_none() {
                    self.read_at = Some(now);
                }
                self.touch(now);
                Transition::Applied
            }
            NotificationStatus::Read | NotificationStatus::Dismissed => Transition::Unchanged,
        }
    }

    /// Any open state → `Dismissed`. Idempotent on `Dismissed`.
    pub fn dismiss(&mut self, now: DateTime<Utc>) -> Transition {
        if self.status == NotificationStatus::Dismissed {
            return Transition::Unchanged;
        }
        self.status = NotificationStatus::Dismissed;
        self.dismissed_at = Some(now);
        self.snoozed_until = None;
        self.touch(now);
        Transition::Applied
    }

    /// `Sent`/`Read`/`Snoozed` → `Snoozed` until `until`. Re-snoozing moves
    /// the deadline. Ignored on `Dismissed`.
    pub fn snooze(&mut self, until: DateTime<Utc>, now: DateTime<Utc>) -> Transition {
        if self.status == NotificationStatus::Dismissed {
            return Transition::Unchanged;
        }
        self.status = NotificationStatus::Snoozed;
        self.snoozed_until = Some(until);
        self.touch(now);
        Transition::Applied
    }

    /// `Snoozed` → `Sent`. No-op in every other state.
    pub fn unsnooze(&mut self, now: DateTime<Utc>) -> Transition {
        if self.status != NotificationStatus::Snoozed {
            return Transition::Unchanged;
        }
        self.status = NotificationStatus::Sent;
        self.snoozed_until = None;
        self.touch(now);
        Transition::Applied
    }

    /// The snooze deadline has passed.
    pub fn snooze_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == NotificationStatus::Snoozed
            && self.snoozed_until.is_some_and(|until| now >= until)
    }

    /// `draft` covers every entity of this record and at least one more.
    pub fn is_covered_by(&self, draft: &NotificationDraft) -> bool {
        draft.kind == self.kind && draft.data.is_strict_superset_of(&self.data)
    }

    /// Fold a re-detection into this record.
    ///
    /// A draft with the same `dedupe_key` refreshes the payload and raises
    /// the priority when it is more urgent. A draft covering a strict
    /// superset of the entities replaces the payload and key. Status, id,
    /// and `created_at` are untouched and priority never goes down. A
    /// dismissed record is never modified.
    pub fn escalate(&mut self, draft: &NotificationDraft, now: DateTime<Utc>) -> EscalationOutcome {
        if !self.status.is_open() {
            return EscalationOutcome::Rejected;
        }
        let same_key = draft.kind == self.kind && draft.dedupe_key == self.dedupe_key;
        if !same_key && !self.is_covered_by(draft) {
            return EscalationOutcome::Unchanged;
        }

        let previous = self.priority;
        let priority = previous.max(draft.priority);
        if same_key && draft.data == self.data && priority == previous {
            return EscalationOutcome::Unchanged;
        }

        self.title = draft.title.clone();
        self.message = draft.message.clone();
        self.data = draft.data.clone();
        self.dedupe_key = draft.dedupe_key.clone();
        self.is_grouped = draft.is_grouped();
        self.priority = priority;
        self.touch(now);

        if same_key && priority == previous {
            EscalationOutcome::Refreshed
        } else {
            EscalationOutcome::Escalated {
                priority_raised: priority > previous,
            }
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}
