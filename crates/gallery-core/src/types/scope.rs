//! Folder scope of a listing or mutation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::FolderId;

/// The folder context an operation applies to.
///
/// `Root` is a real location (items whose parent is null), distinct from
/// "no filter at all".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "folder_id", rename_all = "snake_case")]
pub enum Scope {
    /// Top level of the folder forest.
    Root,
    /// Inside the given folder.
    Folder(FolderId),
}

impl Scope {
    /// The folder id, or `None` at the root.
    pub fn folder_id(&self) -> Option<&FolderId> {
        match self {
            Self::Root => None,
            Self::Folder(id) => Some(id),
        }
    }

    /// Whether this is the root scope.
    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

impl From<Option<FolderId>> for Scope {
    fn from(id: Option<FolderId>) -> Self {
        id.map_or(Self::Root, Self::Folder)
    }
}

impl From<FolderId> for Scope {
    fn from(id: FolderId) -> Self {
        Self::Folder(id)
    }
}

impl From<Scope> for Option<FolderId> {
    fn from(scope: Scope) -> Self {
        match scope {
            Scope::Root => None,
            Scope::Folder(id) => Some(id),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("/"),
            Self::Folder(id) => write!(f, "folder {id}"),
        }
    }
}
