//! Notification domain entities.

pub mod category;
pub mod kind;
pub mod lifecycle;
pub mod model;
pub mod payload;
pub mod priority;
pub mod setting;
pub mod status;

pub use category::NotificationCategory;
pub use kind::NotificationType;
pub use lifecycle::{EscalationOutcome, Transition};
pub use model::{Notification, NotificationDraft};
pub use payload::{CowSummary, FeedItemSummary, NotificationData};
pub use priority::NotificationPriority;
pub use setting::{CategorySetting, DeliveryChannel, QuietHours, SettingUpdate};
pub use status::NotificationStatus;
