//! Delivery policy: category settings, channels, and quiet hours.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use herdbell_core::config::DeliveryConfig;
use herdbell_core::result::AppResult;
use herdbell_core::traits::Clock;
use herdbell_core::types::{NotificationId, UserId};
use herdbell_entity::notification::{
    DeliveryChannel, Notification, NotificationPriority, NotificationStatus,
};
use herdbell_entity::user::UserRole;
use herdbell_service::settings::{SettingsResolver, is_quiet_now};
use herdbell_store::{NotificationRepository, PendingDeliveries, PendingDelivery};

use crate::request::DeliveryRequest;

/// What [`DeliveryDispatcher::dispatch`] did with one notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Requests placed on the delivery queue.
    pub handed_off: usize,
    /// External hand-offs parked until quiet hours end.
    pub deferred: usize,
    /// Hand-offs skipped: category disabled, or quiet hours with deferral off.
    pub suppressed: usize,
    /// Hand-offs lost to a full or closed queue.
    pub dropped: usize,
}

/// What [`DeliveryDispatcher::flush_deferred`] did for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    /// Parked hand-offs now queued for delivery.
    pub delivered: usize,
    /// Parked hand-offs discarded without delivery.
    pub dropped: usize,
    /// Parked hand-offs still inside their quiet window.
    pub waiting: usize,
}

/// Routes notifications to their channels without waiting on the transport.
#[derive(Debug, Clone)]
pub struct DeliveryDispatcher {
    sender: mpsc::Sender<DeliveryRequest>,
    resolver: SettingsResolver,
    notifications: Arc<NotificationRepository>,
    pending: PendingDeliveries,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    defer_during_quiet_hours: bool,
}

impl DeliveryDispatcher {
    /// Create a dispatcher feeding `sender`.
    pub fn new(
        config: &DeliveryConfig,
        sender: mpsc::Sender<DeliveryRequest>,
        resolver: SettingsResolver,
        notifications: Arc<NotificationRepository>,
        clock: Arc<dyn Clock>,
    ) -> AppResult<Self> {
        Ok(Self {
            sender,
            resolver,
            notifications,
            pending: PendingDeliveries::new(),
            clock,
            timezone: config.tz()?,
            defer_during_quiet_hours: config.defer_during_quiet_hours,
        })
    }

    /// Park deferred hand-offs in `pending`, typically one restored from a
    /// checkpoint.
    pub fn with_pending(mut self, pending: PendingDeliveries) -> Self {
        self.pending = pending;
        self
    }

    /// Parked hand-offs.
    pub fn pending(&self) -> &PendingDeliveries {
        &self.pending
    }

    /// Hand `notification` off to every enabled channel of its category.
    ///
    /// External channels inside the quiet window are parked (or skipped
    /// when deferral is off). `in_app` is never held back.
    pub fn dispatch(&self, notification: &Notification, role: UserRole) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        let setting = self
            .resolver
            .effective_for(notification.user_id, role, notification.category);

        if !setting.enabled {
            debug!(
                user_id = %notification.user_id,
                notification_id = %notification.id,
                category = %notification.category,
                "Category disabled; no hand-off"
            );
            summary.suppressed = setting.channels.len();
            return summary;
        }

        let now = self.clock.now();
        let quiet = is_quiet_now(&setting, now, self.timezone);

        for &channel in &setting.channels {
            if quiet && channel.is_external() {
                if !self.defer_during_quiet_hours {
                    debug!(
                        notification_id = %notification.id,
                        channel = %channel,
                        "Quiet hours; hand-off skipped"
                    );
                    summary.suppressed += 1;
                } else if self.pending.enqueue(PendingDelivery {
                    user_id: notification.user_id,
                    notification_id: notification.id,
                    category: notification.category,
                    channel,
                    queued_at: now,
                }) {
                    debug!(
                        notification_id = %notification.id,
                        channel = %channel,
                        "Quiet hours; hand-off deferred"
                    );
                    summary.deferred += 1;
                }
                continue;
            }

            if self.hand_off(
                notification.user_id,
                notification.id,
                channel,
                notification.priority,
                now,
            ) {
                summary.handed_off += 1;
            } else {
                summary.dropped += 1;
            }
        }

        summary
    }

    /// Re-evaluate `user_id`'s parked hand-offs.
    ///
    /// Entries whose quiet window has ended are queued once and removed.
    /// Entries for records that were read or dismissed, for a disabled
    /// category, or for a channel no longer selected are discarded.
    /// Entries for snoozed records wait.
    pub async fn flush_deferred(&self, user_id: UserId, role: UserRole) -> FlushSummary {
        let mut summary = FlushSummary::default();
        let now = self.clock.now();

        for entry in self.pending.for_user(user_id) {
            let status = self
                .notifications
                .get(user_id, entry.notification_id)
                .await
                .map(|n| (n.status, n.priority));
            let priority = match status {
                Ok((NotificationStatus::Sent, priority)) => priority,
                Ok((NotificationStatus::Snoozed, _)) => {
                    summary.waiting += 1;
                    continue;
                }
                Ok(_) | Err(_) => {
                    self.discard(&entry, "notification no longer unread");
                    summary.dropped += 1;
                    continue;
                }
            };

            let setting = self.resolver.effective_for(user_id, role, entry.category);
            if !setting.delivers_to(entry.channel) {
                self.discard(&entry, "channel no longer enabled");
                summary.dropped += 1;
                continue;
            }
            if is_quiet_now(&setting, now, self.timezone) {
                summary.waiting += 1;
                continue;
            }

            if self.pending.remove(entry.notification_id, entry.channel) {
                if self.hand_off(user_id, entry.notification_id, entry.channel, priority, now) {
                    summary.delivered += 1;
                } else {
                    summary.dropped += 1;
                }
            }
        }

        summary
    }

    fn discard(&self, entry: &PendingDelivery, reason: &str) {
        self.pending.remove(entry.notification_id, entry.channel);
        debug!(
            user_id = %entry.user_id,
            notification_id = %entry.notification_id,
            channel = %entry.channel,
            reason,
            "Deferred hand-off discarded"
        );
    }

    fn hand_off(
        &self,
        user_id: UserId,
        notification_id: NotificationId,
        channel: DeliveryChannel,
        priority: NotificationPriority,
        now: DateTime<Utc>,
    ) -> bool {
        let request = DeliveryRequest {
            user_id,
            notification_id,
            channel,
            priority,
            requested_at: now,
        };
        match self.sender.try_send(request) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    notification_id = %notification_id,
                    channel = %channel,
                    "Delivery queue full, dropping hand-off"
                );
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!(
                    notification_id = %notification_id,
                    channel = %channel,
                    "Delivery queue closed, dropping hand-off"
                );
                false
            }
        }
    }
}
