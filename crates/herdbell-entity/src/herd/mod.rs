//! Herd and feed facts read from the domain stores.
//!
//! These types are consumed by the detectors and never stored by the
//! engine.

pub mod cattle;
pub mod feed;
pub mod snapshot;

pub use cattle::{BreedingRecord, CalvingRecord, VaccinationRecord};
pub use feed::FeedItem;
pub use snapshot::HerdSnapshot;
