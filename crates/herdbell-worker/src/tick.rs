//! One re-evaluation pass over every registered user.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use herdbell_core::config::DetectionConfig;
use herdbell_core::result::AppResult;
use herdbell_core::traits::Clock;
use herdbell_core::types::UserId;
use herdbell_entity::notification::{NotificationDraft, NotificationType};
use herdbell_entity::user::UserRole;
use herdbell_dispatch::DeliveryDispatcher;
use herdbell_service::{DetectorSet, SnapshotProvider, UserDirectory, group_candidates};
use herdbell_store::{NotificationRepository, ReconcileOutcome};

/// Counts from one tick.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TickReport {
    /// When the tick started.
    pub started_at: Option<DateTime<Utc>>,
    /// Snapshot date, when it could be read.
    pub as_of: Option<NaiveDate>,
    /// Users fully processed.
    pub users: usize,
    /// Candidates produced by the detectors.
    pub candidates: usize,
    /// Grouped drafts reconciled per user.
    pub drafts: usize,
    /// Records created.
    pub created: usize,
    /// Records escalated in place.
    pub escalated: usize,
    /// Records whose payload details were updated at the same priority.
    pub refreshed: usize,
    /// Drafts already matched by an open record.
    pub unchanged: usize,
    /// Snoozed records returned to unread.
    pub reactivated: usize,
    /// Requests placed on the delivery queue, deferred ones included.
    pub handed_off: usize,
    /// External hand-offs parked for quiet hours.
    pub deferred: usize,
    /// Parked hand-offs discarded.
    pub deferred_dropped: usize,
    /// Hand-offs lost to a full queue.
    pub dropped: usize,
    /// Detectors skipped because their snapshot query failed.
    pub skipped_detectors: Vec<NotificationType>,
    /// The tick stopped early.
    pub cancelled: bool,
}

/// Detect, group, reconcile, hand off, sweep, and flush.
#[derive(Debug, Clone)]
pub struct ReevaluationTick {
    detectors: DetectorSet,
    detection: DetectionConfig,
    snapshots: Arc<dyn SnapshotProvider>,
    directory: Arc<dyn UserDirectory>,
    notifications: Arc<NotificationRepository>,
    dispatcher: Arc<DeliveryDispatcher>,
    clock: Arc<dyn Clock>,
}

impl ReevaluationTick {
    /// Create a tick over its collaborators.
    pub fn new(
        detection: DetectionConfig,
        snapshots: Arc<dyn SnapshotProvider>,
        directory: Arc<dyn UserDirectory>,
        notifications: Arc<NotificationRepository>,
        dispatcher: Arc<DeliveryDispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            detectors: DetectorSet::new(detection.clone()),
            detection,
            snapshots,
            directory,
            notifications,
            dispatcher,
            clock,
        }
    }

    /// The store this tick reconciles into.
    pub fn notifications(&self) -> &Arc<NotificationRepository> {
        &self.notifications
    }

    /// The dispatcher this tick hands off through.
    pub fn dispatcher(&self) -> &Arc<DeliveryDispatcher> {
        &self.dispatcher
    }

    /// Run one tick. Cancellation is honoured between detectors and
    /// between users.
    ///
    /// Herd facts are farm-wide, so detection runs once and the drafts are
    /// reconciled into every user's store.
    pub async fn run(&self, cancel: &CancellationToken) -> AppResult<TickReport> {
        let mut report = TickReport {
            started_at: Some(self.clock.now()),
            ..TickReport::default()
        };
        let users = self.directory.users().await?;

        let detection = self.detectors.run(self.snapshots.as_ref(), cancel).await;
        report.as_of = detection.as_of;
        report.candidates = detection.candidates.len();
        report.skipped_detectors = detection.skipped.iter().map(|s| s.kind).collect();
        if detection.cancelled {
            report.cancelled = true;
            info!("Tick cancelled during detection");
            return Ok(report);
        }

        let drafts = group_candidates(detection.candidates, &self.detection);
        report.drafts = drafts.len();

        for user_id in users {
            if cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            let role = match self.directory.role_of(user_id).await {
                Ok(role) => role,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Role lookup failed; skipping user");
                    continue;
                }
            };
            self.run_user(user_id, role, &drafts, &mut report).await;
            report.users += 1;
        }

        info!(
            users = report.users,
            candidates = report.candidates,
            created = report.created,
            escalated = report.escalated,
            reactivated = report.reactivated,
            handed_off = report.handed_off,
            deferred = report.deferred,
            skipped = report.skipped_detectors.len(),
            cancelled = report.cancelled,
            "Tick complete"
        );
        Ok(report)
    }

    async fn run_user(
        &self,
        user_id: UserId,
        role: UserRole,
        drafts: &[NotificationDraft],
        report: &mut TickReport,
    ) {
        for draft in drafts {
            let outcome = self
                .notifications
                .reconcile(user_id, draft.clone(), self.clock.now())
                .await;
            match &outcome {
                ReconcileOutcome::Created(_) => report.created += 1,
                ReconcileOutcome::Escalated { .. } => report.escalated += 1,
                ReconcileOutcome::Refreshed(_) => report.refreshed += 1,
                ReconcileOutcome::Unchanged(_) => report.unchanged += 1,
            }
            if let Some(notification) = outcome.deliverable() {
                let summary = self.dispatcher.dispatch(notification, role);
                report.handed_off += summary.handed_off;
                report.deferred += summary.deferred;
                report.dropped += summary.dropped;
            }
        }

        let reactivated = self
            .notifications
            .sweep_expired_snoozes(user_id, self.clock.now())
            .await;
        report.reactivated += reactivated.len();

        let flush = self.dispatcher.flush_deferred(user_id, role).await;
        report.handed_off += flush.delivered;
        report.deferred_dropped += flush.dropped;

        debug!(
            user_id = %user_id,
            role = %role,
            reactivated = reactivated.len(),
            deferred_delivered = flush.delivered,
            "User re-evaluated"
        );
    }
}
