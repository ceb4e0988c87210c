//! Notification type enumeration and its fixed category mapping.

use serde::{Deserialize, Serialize};

use herdbell_core::error::AppError;

use super::category::NotificationCategory;

/// The condition a notification reports. One detector exists per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    /// Feed stock at or below its minimum level.
    LowStock,
    /// Pregnancy diagnosis due or overdue.
    PdDue,
    /// Vaccination due or overdue.
    VaccinationDue,
    /// Expected delivery (calving) approaching.
    DeliveryDue,
    /// Artificial insemination due or overdue.
    AiDue,
}

impl NotificationType {
    /// Every type, in detector order.
    pub const ALL: [Self; 5] = [
        Self::LowStock,
        Self::PdDue,
        Self::VaccinationDue,
        Self::DeliveryDue,
        Self::AiDue,
    ];

    /// The category this type always belongs to.
    pub fn category(&self) -> NotificationCategory {
        match self {
            Self::LowStock | Self::DeliveryDue => NotificationCategory::Alerts,
            Self::PdDue | Self::VaccinationDue | Self::AiDue => NotificationCategory::Reminders,
        }
    }

    /// Return the type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowStock => "low_stock",
            Self::PdDue => "pd_due",
            Self::VaccinationDue => "vaccination_due",
            Self::DeliveryDue => "delivery_due",
            Self::AiDue => "ai_due",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.to_lowercase())
            .ok_or_else(|| AppError::validation(format!("Invalid notification type: '{s}'")))
    }
}
