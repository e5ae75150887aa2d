//! CLI command definitions and dispatch.

pub mod auth;
pub mod config;
pub mod folder;
pub mod image;
pub mod upload;

use clap::{Parser, Subcommand};
use tracing::debug;

use gallery_client::HttpGalleryClient;
use gallery_client::session::{FileSessionStore, SessionStore};
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;
use gallery_core::types::{FolderId, Scope};

use crate::output::OutputFormat;

/// Photo gallery command-line client
#[derive(Debug, Parser)]
#[command(name = "gallery-cli", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login(auth::LoginArgs),
    /// Create an account
    Register(auth::RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the stored session
    Whoami,
    /// Folder operations
    Folder(folder::FolderArgs),
    /// Image operations
    Image(image::ImageArgs),
    /// Upload images
    Upload(upload::UploadArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = load_config(&self.config)?;
        match &self.command {
            Commands::Login(args) => auth::login(args, &config).await,
            Commands::Register(args) => auth::register(args, &config).await,
            Commands::Logout => auth::logout(&config).await,
            Commands::Whoami => auth::whoami(&config, self.format).await,
            Commands::Folder(args) => folder::execute(args, &config, self.format).await,
            Commands::Image(args) => image::execute(args, &config, self.format).await,
            Commands::Upload(args) => upload::execute(args, &config, self.format).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}

/// Helper: the session store named by the configuration
pub fn session_store(config: &AppConfig) -> FileSessionStore {
    FileSessionStore::new(&config.session.token_file)
}

/// Helper: an API client carrying the stored session
pub async fn connect(config: &AppConfig) -> Result<HttpGalleryClient, AppError> {
    let session = session_store(config).load().await?;
    debug!(
        base_url = %config.api.base_url,
        authenticated = session.is_authenticated(),
        "Connecting to gallery backend"
    );
    HttpGalleryClient::new(&config.api, session)
}

/// Helper: turn an optional folder id argument into a scope (`None` is the root)
pub fn scope_arg(folder_id: Option<&str>) -> Scope {
    Scope::from(folder_id.map(FolderId::new))
}

/// Helper: ask before a destructive action unless `--yes` was given
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool, AppError> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
