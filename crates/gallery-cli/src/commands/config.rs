//! Configuration inspection commands.

use clap::{Args, Subcommand};

use gallery_core::config::AppConfig;
use gallery_core::error::AppError;

use crate::output::{self, OutputFormat};

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
    /// Show the effective configuration
    Show,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => match format {
            OutputFormat::Table => {
                println!("Configuration ({config_path})");
                output::print_kv("api.base_url", &config.api.base_url);
                output::print_kv("api.auth_prefix", &config.api.auth_prefix);
                output::print_kv(
                    "api.request_timeout_seconds",
                    &config
                        .api
                        .request_timeout_seconds
                        .map_or_else(|| "none".to_string(), |s| s.to_string()),
                );
                output::print_kv("session.token_file", &config.session.token_file);
                output::print_kv(
                    "browser.breadcrumb",
                    &format!("{:?}", config.browser.breadcrumb).to_lowercase(),
                );
                output::print_kv("logging.level", &config.logging.level);
                output::print_kv("logging.format", &config.logging.format);
            }
            OutputFormat::Json => output::print_item(config, format),
        },
    }

    Ok(())
}
