//! Per-category delivery settings.

use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};

use herdbell_core::error::AppError;

use super::category::NotificationCategory;

/// Where a notification can be handed off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryChannel {
    /// The in-app bell and list.
    InApp,
    /// Email.
    Email,
    /// WhatsApp message.
    Whatsapp,
}

impl DeliveryChannel {
    /// Channels that leave the app and are subject to quiet hours.
    pub fn is_external(&self) -> bool {
        !matches!(self, Self::InApp)
    }

    /// Return the channel as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InApp => "in_app",
            Self::Email => "email",
            Self::Whatsapp => "whatsapp",
        }
    }
}

impl std::fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DeliveryChannel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "in_app" | "inapp" => Ok(Self::InApp),
            "email" => Ok(Self::Email),
            "whatsapp" => Ok(Self::Whatsapp),
            _ => Err(AppError::validation(format!(
                "Invalid channel: '{s}'. Expected one of: in_app, email, whatsapp"
            ))),
        }
    }
}

/// A time-of-day window during which external delivery is suppressed.
///
/// `start > end` means the window wraps midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    /// Window start (inclusive).
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    /// Window end (exclusive).
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl QuietHours {
    /// Create a window from two times of day.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse a window from `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self, AppError> {
        Ok(Self {
            start: hhmm::parse(start)?,
            end: hhmm::parse(end)?,
        })
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= now && now < self.end
        } else {
            now >= self.start || now < self.end
        }
    }
}

/// Effective delivery policy for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySetting {
    /// The category this setting applies to.
    pub category: NotificationCategory,
    /// Whether notifications in this category are handed off at all.
    pub enabled: bool,
    /// Channels that receive a hand-off.
    pub channels: BTreeSet<DeliveryChannel>,
    /// Optional quiet window for external channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
}

impl CategorySetting {
    /// Build a setting without quiet hours.
    pub fn new(
        category: NotificationCategory,
        enabled: bool,
        channels: impl IntoIterator<Item = DeliveryChannel>,
    ) -> Self {
        Self {
            category,
            enabled,
            channels: channels.into_iter().collect(),
            quiet_hours: None,
        }
    }

    /// Reject settings that cannot be honoured.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.enabled && self.channels.is_empty() {
            return Err(AppError::invalid_setting(format!(
                "Category '{}' cannot be enabled with no delivery channels",
                self.category
            )));
        }
        if let Some(window) = &self.quiet_hours {
            if window.start == window.end {
                return Err(AppError::invalid_setting(format!(
                    "Quiet hours for '{}' must have different start and end times",
                    self.category
                )));
            }
        }
        Ok(())
    }

    /// Whether `channel` should receive hand-offs for this category.
    pub fn delivers_to(&self, channel: DeliveryChannel) -> bool {
        self.enabled && self.channels.contains(&channel)
    }

    /// Whether an external hand-off at `now` is suppressed.
    pub fn is_quiet_at(&self, now: NaiveTime) -> bool {
        self.quiet_hours.is_some_and(|window| window.contains(now))
    }
}

/// A partial or full update to a category setting.
///
/// Absent fields keep their current value. `quiet_hours: null` clears
/// the window; omitting the field leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingUpdate {
    /// New enabled flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// New channel set (replaces the current set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<BTreeSet<DeliveryChannel>>,
    /// `Some(None)` clears quiet hours, `Some(Some(_))` sets them.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub quiet_hours: Option<Option<QuietHours>>,
}

impl SettingUpdate {
    /// An update that replaces every field.
    pub fn full(setting: &CategorySetting) -> Self {
        Self {
            enabled: Some(setting.enabled),
            channels: Some(setting.channels.clone()),
            quiet_hours: Some(setting.quiet_hours),
        }
    }

    /// Merge this update over `current`, producing the full replacement.
    pub fn apply_to(&self, current: &CategorySetting) -> CategorySetting {
        CategorySetting {
            category: current.category,
            enabled: self.enabled.unwrap_or(current.enabled),
            channels: self
                .channels
                .clone()
                .unwrap_or_else(|| current.channels.clone()),
            quiet_hours: self.quiet_hours.unwrap_or(current.quiet_hours),
        }
    }
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// `"HH:MM"` serialization for times of day.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use herdbell_core::error::AppError;

    pub fn parse(value: &str) -> Result<NaiveTime, AppError> {
        NaiveTime::parse_from_str(value, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
            .map_err(|e| AppError::invalid_setting(format!("Invalid time '{value}': {e}")))
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }
}
