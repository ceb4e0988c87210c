//! Detector set: pure functions mapping herd facts to candidates.

pub mod candidate;
pub mod cattle;
pub mod feed;
pub mod set;

pub use candidate::{AffectedEntity, Candidate};
pub use set::{Detection, DetectorSet, SkippedDetector};
