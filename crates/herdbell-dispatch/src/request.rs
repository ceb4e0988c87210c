//! Queued hand-off requests.

use chrono::{DateTime, Utc};

use herdbell_core::types::{NotificationId, UserId};
use herdbell_entity::notification::{DeliveryChannel, NotificationPriority};

/// One hand-off of one notification to one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    /// Owner of the notification.
    pub user_id: UserId,
    /// The notification to deliver.
    pub notification_id: NotificationId,
    /// Target channel.
    pub channel: DeliveryChannel,
    /// Priority at hand-off time.
    pub priority: NotificationPriority,
    /// When the request was queued.
    pub requested_at: DateTime<Utc>,
}
