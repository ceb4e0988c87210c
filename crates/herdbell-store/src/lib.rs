//! # herdbell-store
//!
//! Authoritative in-memory state for HerdBell: the notification lifecycle
//! store with its per-user locks and open-record index, the per-user
//! category-setting overrides, the hand-offs parked for quiet hours, and
//! JSON checkpoints of all three.

pub mod checkpoint;
pub mod repositories;

pub use checkpoint::{Checkpoint, CheckpointFile};
pub use repositories::{
    NotificationRepository, PendingDeliveries, PendingDelivery, ReconcileOutcome,
    SettingsRepository,
};
