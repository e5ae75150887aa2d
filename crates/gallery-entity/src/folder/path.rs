//! Breadcrumb reconstruction over the folders seen so far.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use gallery_core::types::FolderId;

use super::model::Folder;

/// One entry of the backend's ancestor chain (`/folders/breadcrumb/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crumb {
    /// Folder ID.
    pub id: FolderId,
    /// Folder name.
    pub name: String,
}

/// Folders observed in earlier listings, keyed by id.
///
/// Listings only return the children of one folder, so the index is what
/// makes an ancestor walk possible after several navigations.
#[derive(Debug, Clone, Default)]
pub struct FolderIndex {
    folders: HashMap<FolderId, Folder>,
}

impl FolderIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or refresh) a batch of folders.
    pub fn insert_all<'a>(&mut self, folders: impl IntoIterator<Item = &'a Folder>) {
        for folder in folders {
            self.folders.insert(folder.id.clone(), folder.clone());
        }
    }

    /// Record a resolved ancestor chain.
    pub fn insert_path(&mut self, path: &FolderPath) {
        self.insert_all(path.folders());
    }

    /// Forget a folder (after it was deleted).
    pub fn remove(&mut self, id: &FolderId) -> Option<Folder> {
        self.folders.remove(id)
    }

    /// Point a known folder at a new parent (after a move).
    pub fn reparent(&mut self, id: &FolderId, parent: Option<FolderId>) {
        if let Some(folder) = self.folders.get_mut(id) {
            folder.parent_id = parent;
        }
    }

    /// Look up a folder by id.
    pub fn get(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.get(id)
    }

    /// Number of folders known.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether no folder is known yet.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Walk parent pointers from `start` up to a top-level folder.
    ///
    /// The walk stops at a null parent (complete chain), at an ancestor that
    /// is not in the index, or at an id already visited. The last two yield a
    /// truncated path rather than an error.
    pub fn ancestry(&self, start: &FolderId) -> FolderPath {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut cursor = Some(start.clone());
        let mut complete = false;

        while let Some(id) = cursor.take() {
            if !visited.insert(id.clone()) {
                break;
            }
            let Some(folder) = self.folders.get(&id) else {
                break;
            };
            chain.push(folder.clone());
            match &folder.parent_id {
                Some(parent) => cursor = Some(parent.clone()),
                None => complete = true,
            }
        }

        chain.reverse();
        FolderPath {
            folders: chain,
            complete,
        }
    }
}

/// Ordered folders from a top-level folder down to the current folder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FolderPath {
    folders: Vec<Folder>,
    complete: bool,
}

impl FolderPath {
    /// The empty path of the root scope.
    pub fn root() -> Self {
        Self {
            folders: Vec::new(),
            complete: true,
        }
    }

    /// Build a complete path from the backend's ancestor chain, which lists
    /// crumbs top-down. Each crumb's parent is the crumb before it.
    pub fn from_crumbs(crumbs: Vec<Crumb>) -> Self {
        let mut folders = Vec::with_capacity(crumbs.len());
        let mut parent: Option<FolderId> = None;
        for crumb in crumbs {
            folders.push(Folder {
                id: crumb.id.clone(),
                name: crumb.name,
                parent_id: parent.take(),
            });
            parent = Some(crumb.id);
        }
        Self {
            folders,
            complete: true,
        }
    }

    /// The folders in top-down order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Whether the chain reaches a top-level folder.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Whether ancestors are missing from the front of the chain.
    pub fn is_truncated(&self) -> bool {
        !self.complete
    }

    /// The deepest folder, if any.
    pub fn current(&self) -> Option<&Folder> {
        self.folders.last()
    }

    /// Whether `id` appears anywhere on the path.
    pub fn contains(&self, id: &FolderId) -> bool {
        self.folders.iter().any(|f| &f.id == id)
    }

    /// Number of folders on the path.
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    /// Whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Render as `/A/B/C`, prefixed with `…` when truncated.
    pub fn display(&self) -> String {
        let joined: String = self
            .folders
            .iter()
            .map(|f| format!("/{}", f.name))
            .collect();
        match (self.complete, joined.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => joined,
            (false, _) => format!("…{joined}"),
        }
    }
}
