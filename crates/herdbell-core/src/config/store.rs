//! Lifecycle store configuration.

use serde::{Deserialize, Serialize};

/// Lifecycle store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON checkpoint file. When unset the store is purely in-memory.
    #[serde(default)]
    pub checkpoint_path: Option<String>,
    /// Default history window (days) used when a caller does not pass one.
    #[serde(default = "default_history_days")]
    pub history_default_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            checkpoint_path: None,
            history_default_days: default_history_days(),
        }
    }
}

fn default_history_days() -> i64 {
    30
}
