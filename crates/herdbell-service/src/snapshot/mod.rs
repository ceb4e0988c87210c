//! Sources of herd facts.

pub mod file;
pub mod memory;
pub mod provider;

pub use file::JsonSnapshotProvider;
pub use memory::StaticSnapshotProvider;
pub use provider::SnapshotProvider;
