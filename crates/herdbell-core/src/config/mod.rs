//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod delivery;
pub mod detection;
pub mod logging;
pub mod scheduler;
pub mod store;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use self::delivery::DeliveryConfig;
pub use self::detection::DetectionConfig;
pub use self::logging::LoggingConfig;
pub use self::scheduler::SchedulerConfig;
pub use self::store::StoreConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged TOML configuration
/// (base file + environment overlay + `HERDBELL__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Re-evaluation tick schedule.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Detector look-ahead windows.
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Delivery hand-off settings.
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Lifecycle store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Domain snapshot source.
    #[serde(default)]
    pub snapshot: SnapshotSourceConfig,
    /// Users whose notifications the engine maintains.
    #[serde(default)]
    pub users: Vec<UserEntry>,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the server reads herd facts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotSourceConfig {
    /// Path of the JSON snapshot file.
    #[serde(default = "default_snapshot_path")]
    pub path: String,
}

impl Default for SnapshotSourceConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
        }
    }
}

/// A user registered with the engine, with their already-resolved role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// User identifier (UUID).
    pub id: String,
    /// Role name: `admin`, `worker`, or `viewer`.
    pub role: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// The overlay environment comes from `HERDBELL_ENV` (default
    /// `development`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let env = std::env::var("HERDBELL_ENV").unwrap_or_else(|_| "development".to_string());
        Self::load_layered(path, &env)
    }

    /// Load configuration from a base file, a sibling `<env>.toml` overlay,
    /// and environment variables prefixed with `HERDBELL__`.
    pub fn load_layered(path: &str, env: &str) -> Result<Self, AppError> {
        let overlay = Path::new(path)
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(env);

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::from(overlay).required(false))
            .add_source(
                config::Environment::with_prefix("HERDBELL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.scheduler.interval_seconds == 0 {
            return Err(AppError::configuration(
                "scheduler.interval_seconds must be greater than zero",
            ));
        }
        if self.delivery.queue_capacity == 0 {
            return Err(AppError::configuration(
                "delivery.queue_capacity must be greater than zero",
            ));
        }
        if self.store.history_default_days <= 0 {
            return Err(AppError::configuration(
                "store.history_default_days must be greater than zero",
            ));
        }
        self.delivery.tz()?;
        Ok(())
    }
}

fn default_snapshot_path() -> String {
    "data/snapshot.json".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scheduler.interval_seconds, 300);
        assert_eq!(config.detection.delivery_window_days, 7);
        assert_eq!(config.delivery.timezone, "UTC");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herdbell.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[scheduler]
interval_seconds = 60

[delivery]
timezone = "Asia/Kolkata"

[[users]]
id = "7f1c2a52-4d7e-4bb3-9a57-0c1f5b0d9e11"
role = "worker"
"#
        )
        .unwrap();

        let config = AppConfig::load_layered(path.to_str().unwrap(), "test").unwrap();
        assert_eq!(config.scheduler.interval_seconds, 60);
        assert!(config.scheduler.run_on_start);
        assert_eq!(config.delivery.timezone, "Asia/Kolkata");
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].role, "worker");
    }

    #[test]
    fn test_invalid_timezone_rejected() {
        let mut config = AppConfig::default();
        config.delivery.timezone = "Mars/Olympus".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = AppConfig::default();
        config.scheduler.interval_seconds = 0;
        assert!(config.validate().is_err());
    }
}
