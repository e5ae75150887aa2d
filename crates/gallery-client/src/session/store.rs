//! Session persistence.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use gallery_core::error::AppError;
use gallery_core::result::AppResult;

use super::Session;

/// Keeps the session between runs. Login writes it, logout clears it.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Load the stored session, or an anonymous one if nothing is stored.
    async fn load(&self) -> AppResult<Session>;

    /// Persist a session.
    async fn save(&self, session: &Session) -> AppResult<()>;

    /// Forget the stored session.
    async fn clear(&self) -> AppResult<()>;
}

/// JSON file-backed session store.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Create a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The session file location.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> AppResult<Session> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let session: Session = serde_json::from_slice(&bytes)?;
                debug!(path = %self.path.display(), "Session loaded");
                Ok(session)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Session::anonymous()),
            Err(e) => Err(AppError::with_source(
                gallery_core::error::ErrorKind::Storage,
                format!("Failed to read session file '{}'", self.path.display()),
                e,
            )),
        }
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(session)?;
        tokio::fs::write(&self.path, json).await?;
        info!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory session store.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    session: Arc<Mutex<Session>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> AppResult<Session> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> AppResult<()> {
        *self.session.lock().await = session.clone();
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.session.lock().await = Session::anonymous();
        Ok(())
    }
}
