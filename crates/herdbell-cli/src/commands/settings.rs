//! Settings inspection commands.

use chrono::NaiveTime;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use herdbell_core::error::AppError;
use herdbell_entity::notification::{CategorySetting, QuietHours};
use herdbell_entity::user::UserRole;
use herdbell_service::settings::role_defaults;

/// Arguments for settings commands
#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings subcommand
    #[command(subcommand)]
    pub command: SettingsCommand,
}

/// Settings subcommands
#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show the default category settings for a role
    Defaults {
        /// Role name (admin, worker, viewer; anything else maps to viewer)
        #[arg(short, long)]
        role: String,
    },
    /// Check whether a local time falls inside a quiet window
    QuietCheck {
        /// Window start, HH:MM
        #[arg(long)]
        start: String,
        /// Window end, HH:MM (before start means the window wraps midnight)
        #[arg(long)]
        end: String,
        /// Local time to test, HH:MM
        #[arg(long)]
        at: String,
    },
}

/// One category setting as a table row.
#[derive(Debug, Serialize, Tabled)]
pub struct SettingRow {
    /// Category
    #[tabled(rename = "Category")]
    pub category: String,
    /// Enabled flag
    #[tabled(rename = "Enabled")]
    pub enabled: bool,
    /// Comma-separated channels
    #[tabled(rename = "Channels")]
    pub channels: String,
    /// Quiet window or "-"
    #[tabled(rename = "Quiet Hours")]
    pub quiet_hours: String,
}

impl From<&CategorySetting> for SettingRow {
    fn from(setting: &CategorySetting) -> Self {
        Self {
            category: setting.category.to_string(),
            enabled: setting.enabled,
            channels: setting
                .channels
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            quiet_hours: setting
                .quiet_hours
                .map(|w| format!("{}-{}", w.start.format("%H:%M"), w.end.format("%H:%M")))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// Execute settings commands
pub fn execute(args: &SettingsArgs, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        SettingsCommand::Defaults { role } => {
            let role = UserRole::from_name(role);
            let rows: Vec<SettingRow> = role_defaults(role).values().map(SettingRow::from).collect();
            output::print_list(&rows, format);
        }
        SettingsCommand::QuietCheck { start, end, at } => {
            let window = QuietHours::parse(start, end)?;
            let at = NaiveTime::parse_from_str(at, "%H:%M")
                .map_err(|e| AppError::validation(format!("Invalid time '{at}': {e}")))?;
            if window.contains(at) {
                output::print_success(&format!("{} is inside quiet hours {}-{}", at.format("%H:%M"), start, end));
            } else {
                output::print_success(&format!("{} is outside quiet hours {}-{}", at.format("%H:%M"), start, end));
            }
        }
    }

    Ok(())
}
