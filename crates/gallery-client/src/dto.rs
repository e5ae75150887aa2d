//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use gallery_core::types::FolderId;

/// Body of `POST /folders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Parent folder (null for top level).
    pub parent_id: Option<FolderId>,
}

/// Response of `POST /folders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedFolder {
    /// Backend confirmation message.
    #[serde(default)]
    pub message: String,
    /// Id of the new folder.
    pub folder_id: FolderId,
}

/// Body of the move and copy endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReparentRequest {
    /// Destination folder (null for the root).
    pub parent_id: Option<FolderId>,
}

/// Login / registration credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Plain-text password, sent over the wire only.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Response of the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Issued bearer token.
    pub token: String,
    /// Backend message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Generic `{ "message": ... }` body used by most endpoints and by errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Backend message.
    #[serde(default)]
    pub message: Option<String>,
}

/// One file of a multi-file upload, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// File name sent with the part.
    pub name: String,
    /// File content.
    pub content: Vec<u8>,
    /// MIME type of the part.
    pub content_type: String,
}

/// Response of `POST /upload-multiple`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Backend message.
    #[serde(default)]
    pub message: String,
    /// Public URLs of the stored images, in upload order.
    #[serde(default)]
    pub urls: Vec<String>,
}
