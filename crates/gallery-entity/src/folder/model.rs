//! Folder entity model.

use serde::{Deserialize, Serialize};

use gallery_core::types::{FolderId, Scope};

/// A folder in the user's folder forest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// Parent folder ID (null for top-level folders).
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

impl Folder {
    /// Check if this is a top-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// The scope this folder is listed in.
    pub fn parent_scope(&self) -> Scope {
        Scope::from(self.parent_id.clone())
    }

    /// The scope of this folder's own contents.
    pub fn scope(&self) -> Scope {
        Scope::Folder(self.id.clone())
    }
}
