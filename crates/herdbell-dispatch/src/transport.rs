//! Outbound transport abstraction.

use async_trait::async_trait;
use tracing::info;

use herdbell_core::result::AppResult;
use herdbell_core::types::NotificationId;
use herdbell_entity::notification::DeliveryChannel;

/// Delivers a notification over one channel.
///
/// Called from the delivery worker only. Failures are logged and never
/// retried.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug + 'static {
    /// Hand `notification_id` to `channel`.
    async fn deliver(&self, notification_id: NotificationId, channel: DeliveryChannel) -> AppResult<()>;
}

/// Transport that records every hand-off as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl Transport for LogTransport {
    async fn deliver(&self, notification_id: NotificationId, channel: DeliveryChannel) -> AppResult<()> {
        info!(
            notification_id = %notification_id,
            channel = %channel,
            "Notification handed off"
        );
        Ok(())
    }
}
