//! Photo gallery interactive client.
//!
//! Loads configuration, restores the stored session, and runs the browsing
//! shell on stdin.

mod shell;

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use gallery_browser::{BrowserModel, Confirm};
use gallery_client::HttpGalleryClient;
use gallery_client::session::{FileSessionStore, SessionStore};
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;

use crate::shell::Shell;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Gallery shell failed");
        eprintln!("✗ {}", e.message);
        std::process::exit(1);
    }
}

/// Load configuration from `GALLERY_CONFIG`, or from the `config/`
/// directory for the `GALLERY_ENV` environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    match std::env::var("GALLERY_CONFIG") {
        Ok(path) => AppConfig::load_file(&path),
        Err(_) => {
            let env = std::env::var("GALLERY_ENV").unwrap_or_else(|_| "development".to_string());
            AppConfig::load(&env)
        }
    }
}

/// Initialize tracing/logging. Logs go to stderr so they never interleave
/// with shell output.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Asks on the terminal; anything but an explicit yes declines.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "Starting gallery shell"
    );

    let store = FileSessionStore::new(&config.session.token_file);
    let session = store.load().await?;
    match &session.username {
        Some(user) if session.is_authenticated() => println!("Logged in as '{user}'."),
        _ => println!("⚠ Not logged in; run `gallery-cli login` first."),
    }

    let client = HttpGalleryClient::new(&config.api, session)?;
    let browser = BrowserModel::new(Arc::new(client), config.browser.clone());
    let mut shell = Shell::new(browser, Box::new(TerminalConfirm));

    println!("Type 'help' for commands.");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    shell.run(stdin).await
}
