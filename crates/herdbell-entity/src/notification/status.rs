//! Notification lifecycle status.

use serde::{Deserialize, Serialize};

use herdbell_core::error::AppError;

/// Where a notification is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    /// Active and unread.
    Sent,
    /// Read by the user; stays in history.
    Read,
    /// Dismissed by the user. Terminal.
    Dismissed,
    /// Hidden until `snoozed_until`, then back to `Sent`.
    Snoozed,
}

impl NotificationStatus {
    /// Whether the record still counts as the open instance for its type.
    pub fn is_open(&self) -> bool {
        !matches!(self, Self::Dismissed)
    }

    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Read => "read",
            Self::Dismissed => "dismissed",
            Self::Snoozed => "snoozed",
        }
    }
}

impl std::fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sent" | "unread" => Ok(Self::Sent),
            "read" => Ok(Self::Read),
            "dismissed" => Ok(Self::Dismissed),
            "snoozed" => Ok(Self::Snoozed),
            _ => Err(AppError::validation(format!(
                "Invalid status: '{s}'. Expected one of: sent, read, dismissed, snoozed"
            ))),
        }
    }
}
