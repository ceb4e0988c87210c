//! CLI command definitions and dispatch.

pub mod config;
pub mod evaluate;
pub mod settings;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use herdbell_core::config::AppConfig;
use herdbell_core::error::AppError;

/// HerdBell: livestock notification engine
#[derive(Debug, Parser)]
#[command(name = "herdbell", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one re-evaluation tick against a snapshot file
    Evaluate(evaluate::EvaluateArgs),
    /// Inspect notification settings
    Settings(settings::SettingsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Evaluate(args) => evaluate::execute(args, &self.config, self.format).await,
            Commands::Settings(args) => settings::execute(args, self.format),
            Commands::Config(args) => config::execute(args, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}
