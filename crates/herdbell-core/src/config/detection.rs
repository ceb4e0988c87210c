//! Detector thresholds.

use serde::{Deserialize, Serialize};

/// Look-ahead windows (in days) for the due-soon detectors.
///
/// An entity triggers when its days remaining is less than or equal to the
/// window, so overdue entities always trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Expected-delivery look-ahead.
    #[serde(default = "default_delivery_window")]
    pub delivery_window_days: i64,
    /// Pregnancy-diagnosis look-ahead.
    #[serde(default = "default_short_window")]
    pub pd_window_days: i64,
    /// Vaccination look-ahead.
    #[serde(default = "default_vaccination_window")]
    pub vaccination_window_days: i64,
    /// Insemination look-ahead.
    #[serde(default = "default_short_window")]
    pub ai_window_days: i64,
    /// A delivery this close (or closer) makes the notification high priority.
    #[serde(default = "default_delivery_high")]
    pub delivery_high_priority_days: i64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            delivery_window_days: default_delivery_window(),
            pd_window_days: default_short_window(),
            vaccination_window_days: default_vaccination_window(),
            ai_window_days: default_short_window(),
            delivery_high_priority_days: default_delivery_high(),
        }
    }
}

fn default_delivery_window() -> i64 {
    7
}

fn default_short_window() -> i64 {
    3
}

fn default_vaccination_window() -> i64 {
    7
}

fn default_delivery_high() -> i64 {
    3
}
