//! Notification category enumeration.

use serde::{Deserialize, Serialize};

use herdbell_core::error::AppError;

/// Category of a notification for settings and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Upcoming routine work (PD checks, vaccinations, inseminations).
    Reminders,
    /// Conditions that need attention (low stock, imminent deliveries).
    Alerts,
    /// Informational updates.
    Updates,
}

impl NotificationCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Reminders, Self::Alerts, Self::Updates];

    /// Return the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminders => "reminders",
            Self::Alerts => "alerts",
            Self::Updates => "updates",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reminders" => Ok(Self::Reminders),
            "alerts" => Ok(Self::Alerts),
            "updates" => Ok(Self::Updates),
            _ => Err(AppError::validation(format!(
                "Invalid category: '{s}'. Expected one of: reminders, alerts, updates"
            ))),
        }
    }
}
