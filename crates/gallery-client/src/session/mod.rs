//! Explicit session context handed to API clients.

pub mod store;
pub mod token;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use token::BearerToken;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gallery_core::error::AppError;
use gallery_core::result::AppResult;

/// Who is logged in, if anyone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued at login.
    #[serde(default)]
    pub token: Option<BearerToken>,
    /// Account name used at login.
    #[serde(default)]
    pub username: Option<String>,
    /// When the token was stored.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Session {
    /// A session without a token.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session holding a freshly issued token.
    pub fn authenticated(token: BearerToken, username: impl Into<String>) -> Self {
        Self {
            token: Some(token),
            username: Some(username.into()),
            saved_at: Some(Utc::now()),
        }
    }

    /// The token to send, or an `Authentication` error when it is absent
    /// or already expired.
    pub fn bearer(&self) -> AppResult<&BearerToken> {
        self.bearer_at(Utc::now())
    }

    /// [`Session::bearer`] evaluated at an explicit instant.
    pub fn bearer_at(&self, now: DateTime<Utc>) -> AppResult<&BearerToken> {
        let token = self.token.as_ref().ok_or_else(AppError::unauthenticated)?;
        if token.is_expired_at(now) {
            return Err(AppError::authentication(
                "Unauthenticated: session token has expired",
            ));
        }
        Ok(token)
    }

    /// Whether a usable token is present right now.
    pub fn is_authenticated(&self) -> bool {
        self.bearer().is_ok()
    }
}
