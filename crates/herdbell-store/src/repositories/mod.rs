//! Repository implementations for HerdBell state.

pub mod notification;
pub mod pending;
pub mod settings;

pub use notification::{HistoryQuery, NotificationRepository, ReconcileOutcome};
pub use pending::{PendingDeliveries, PendingDelivery};
pub use settings::{SettingsRepository, StoredSetting};
