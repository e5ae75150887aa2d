//! Account and session commands.

use clap::Args;
use serde::Serialize;

use gallery_client::dto::Credentials;
use gallery_client::session::{Session, SessionStore};
use gallery_client::{AuthApi, HttpGalleryClient};
use gallery_core::config::AppConfig;
use gallery_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for the login command
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the register command
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Username (will prompt if not provided)
    #[arg(short, long)]
    pub username: Option<String>,
    /// Password (will prompt if not provided)
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Session summary shown by `whoami`
#[derive(Debug, Serialize)]
struct SessionInfo {
    username: Option<String>,
    authenticated: bool,
    saved_at: Option<String>,
    expires_at: Option<String>,
    session_file: String,
}

fn prompt_username(given: &Option<String>) -> Result<String, AppError> {
    match given {
        Some(u) => Ok(u.clone()),
        None => dialoguer::Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(|e| AppError::internal(format!("Input error: {e}"))),
    }
}

/// Log in and persist the token
pub async fn login(args: &LoginArgs, config: &AppConfig) -> Result<(), AppError> {
    let username = prompt_username(&args.username)?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let client = HttpGalleryClient::new(&config.api, Session::anonymous())?;
    let token = client
        .login(&Credentials::new(username.clone(), password))
        .await?;

    let store = super::session_store(config);
    store
        .save(&Session::authenticated(token, username.clone()))
        .await?;

    output::print_success(&format!("Logged in as '{username}'"));
    Ok(())
}

/// Create an account
pub async fn register(args: &RegisterArgs, config: &AppConfig) -> Result<(), AppError> {
    let username = prompt_username(&args.username)?;
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    let client = HttpGalleryClient::new(&config.api, Session::anonymous())?;
    let message = client
        .register(&Credentials::new(username, password))
        .await?;

    output::print_success(&message);
    Ok(())
}

/// Remove the stored session
pub async fn logout(config: &AppConfig) -> Result<(), AppError> {
    if sign_out(&super::session_store(config)).await? {
        output::print_success("Logged out");
    } else {
        output::print_warning("No active session");
    }
    Ok(())
}

/// Clear the stored session, expired leftovers included. Returns whether a
/// usable session was signed out.
async fn sign_out(store: &impl SessionStore) -> Result<bool, AppError> {
    let was_active = store.load().await?.is_authenticated();
    store.clear().await?;
    Ok(was_active)
}

/// Show who is logged in
pub async fn whoami(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let store = super::session_store(config);
    let session = store.load().await?;

    let info = SessionInfo {
        username: session.username.clone(),
        authenticated: session.is_authenticated(),
        saved_at: session.saved_at.map(|t| t.to_rfc3339()),
        expires_at: session
            .token
            .as_ref()
            .and_then(|t| t.expires_at())
            .map(|t| t.to_rfc3339()),
        session_file: store.path().display().to_string(),
    };
    output::print_item(&info, format);

    if session.token.is_some() && !info.authenticated {
        output::print_warning("Stored token has expired; run `gallery-cli login`");
    }
    Ok(())
}
