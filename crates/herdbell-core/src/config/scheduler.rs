//! Re-evaluation scheduler configuration.

use serde::{Deserialize, Serialize};

/// Controls when the re-evaluation tick runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Seconds between ticks when no cron expression is set.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Optional six-field cron expression (with seconds). Overrides the interval.
    #[serde(default)]
    pub cron: Option<String>,
    /// Run one tick immediately at startup.
    #[serde(default = "default_true")]
    pub run_on_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: default_interval(),
            cron: None,
            run_on_start: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    300
}
