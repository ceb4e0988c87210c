//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use herdbell_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the merged configuration
    Show,
    /// Validate the configuration file
    Validate,
}

/// Execute config commands
pub fn execute(args: &ConfigArgs, config_path: &str, format: OutputFormat) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path)?;
            output::print_item(&config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                let schedule = match &config.scheduler.cron {
                    Some(expr) => format!("cron '{}'", expr),
                    None => format!("every {}s", config.scheduler.interval_seconds),
                };
                output::print_kv("Schedule", &schedule);
                output::print_kv("Timezone", &config.delivery.timezone);
                output::print_kv("Snapshot", &config.snapshot.path);
                output::print_kv(
                    "Checkpoint",
                    config.store.checkpoint_path.as_deref().unwrap_or("(in-memory)"),
                );
                output::print_kv("Users", &config.users.len().to_string());
                if config.users.is_empty() {
                    output::print_warning("No users configured; ticks will do nothing");
                }
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
    }

    Ok(())
}
