//! Presentation-facing queries and transitions on notification records.

use std::sync::Arc;

use chrono::Duration;
use tracing::debug;

use herdbell_core::error::AppError;
use herdbell_core::result::AppResult;
use herdbell_core::traits::Clock;
use herdbell_core::types::NotificationId;
use herdbell_entity::notification::{Notification, NotificationStatus, Transition};
use herdbell_store::NotificationRepository;
use herdbell_store::repositories::HistoryQuery;

use crate::context::RequestContext;

/// Lists and transitions the caller's notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    repo: Arc<NotificationRepository>,
    clock: Arc<dyn Clock>,
    history_default_days: i64,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(repo: Arc<NotificationRepository>, clock: Arc<dyn Clock>, history_default_days: i64) -> Self {
        Self {
            repo,
            clock,
            history_default_days,
        }
    }

    /// Unread notifications, newest first.
    pub async fn list_unread(&self, ctx: &RequestContext) -> Vec<Notification> {
        self.repo.list_unread(ctx.user_id).await
    }

    /// Number of unread notifications.
    pub async fn unread_count(&self, ctx: &RequestContext) -> usize {
        self.repo.unread_count(ctx.user_id).await
    }

    /// Number of unread `high` notifications.
    pub async fn high_priority_count(&self, ctx: &RequestContext) -> usize {
        self.repo.high_priority_count(ctx.user_id).await
    }

    /// One notification by id.
    pub async fn get(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        self.repo.get(ctx.user_id, id).await
    }

    /// Marks a notification as read.
    pub async fn mark_as_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        let (record, transition) = self.repo.mark_read(ctx.user_id, id, self.clock.now()).await?;
        log_transition("read", &record, transition);
        Ok(record)
    }

    /// Marks every unread notification as read. Returns how many changed.
    pub async fn mark_all_as_read(&self, ctx: &RequestContext) -> usize {
        let changed = self.repo.mark_all_read(ctx.user_id, self.clock.now()).await;
        debug!(user_id = %ctx.user_id, changed, "Marked all as read");
        changed
    }

    /// Dismisses a notification. Dismissing twice succeeds.
    pub async fn dismiss(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        let (record, transition) = self.repo.dismiss(ctx.user_id, id, self.clock.now()).await?;
        log_transition("dismiss", &record, transition);
        Ok(record)
    }

    /// Hides a notification from the unread list for `duration`.
    pub async fn snooze(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
        duration: Duration,
    ) -> AppResult<Notification> {
        if duration <= Duration::zero() {
            return Err(AppError::validation(format!(
                "Snooze duration must be positive, got {} seconds",
                duration.num_seconds()
            )));
        }
        let now = self.clock.now();
        let (record, transition) = self
            .repo
            .snooze(ctx.user_id, id, now + duration, now)
            .await?;
        log_transition("snooze", &record, transition);
        Ok(record)
    }

    /// Returns a snoozed notification to the unread list.
    pub async fn unsnooze(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<Notification> {
        let (record, transition) = self.repo.unsnooze(ctx.user_id, id, self.clock.now()).await?;
        log_transition("unsnooze", &record, transition);
        Ok(record)
    }

    /// Notifications in any status created in the last `days` days,
    /// newest first.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        days: Option<i64>,
        status: Option<NotificationStatus>,
        search: Option<&str>,
    ) -> AppResult<Vec<Notification>> {
        let days = days.unwrap_or(self.history_default_days);
        if days <= 0 {
            return Err(AppError::validation(format!(
                "History window must be at least one day, got {days}"
            )));
        }
        let query = HistoryQuery {
            since: self.clock.now() - Duration::days(days),
            status,
            search: search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string),
        };
        Ok(self.repo.history(ctx.user_id, &query).await)
    }
}

fn log_transition(action: &str, record: &Notification, transition: Transition) {
    debug!(
        user_id = %record.user_id,
        notification_id = %record.id,
        action,
        status = %record.status,
        applied = transition.is_applied(),
        version = record.version,
        "Notification transition"
    );
}
