//! # herdbell-service
//!
//! Business logic for HerdBell. Detectors turn a herd snapshot into
//! candidates, grouping folds them into prioritized drafts, the settings
//! resolver combines role defaults with user overrides, and the
//! notification service exposes the lifecycle operations to callers.
//!
//! Services follow constructor injection: every dependency is handed in
//! at construction time as an `Arc`.

pub mod context;
pub mod detect;
pub mod directory;
pub mod grouping;
pub mod notification;
pub mod settings;
pub mod snapshot;

pub use context::RequestContext;
pub use detect::{Candidate, Detection, DetectorSet};
pub use directory::{StaticUserDirectory, UserDirectory};
pub use grouping::group_candidates;
pub use notification::NotificationService;
pub use settings::{SettingsResolver, SettingsService};
pub use snapshot::{JsonSnapshotProvider, SnapshotProvider, StaticSnapshotProvider};
