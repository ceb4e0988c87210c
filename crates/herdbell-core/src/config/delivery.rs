//! Delivery hand-off configuration.

use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Settings for handing notifications off to the external transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// IANA timezone used to evaluate quiet hours (e.g. `"Asia/Kolkata"`).
    #[serde(default = "default_timezone")]
    pub timezone: String,
    /// Capacity of the hand-off queue between the dispatcher and the transport.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Queue suppressed external deliveries until quiet hours end.
    /// When false, suppressed deliveries are dropped for that occurrence.
    #[serde(default = "default_true")]
    pub defer_during_quiet_hours: bool,
}

impl DeliveryConfig {
    /// Parse the configured timezone.
    pub fn tz(&self) -> Result<Tz, AppError> {
        Tz::from_str(&self.timezone).map_err(|e| {
            AppError::configuration(format!("Invalid timezone '{}': {e}", self.timezone))
        })
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            queue_capacity: default_queue_capacity(),
            defer_during_quiet_hours: true,
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_queue_capacity() -> usize {
    256
}

fn default_true() -> bool {
    true
}
