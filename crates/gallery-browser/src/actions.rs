//! Mutating operations: create, delete, paste, upload.
//!
//! Each one issues a single backend call and then refetches the affected
//! scope. Local state is only touched after the call succeeded. Once the
//! backend has accepted a change the operation reports success; a failed
//! refetch only marks the view stale.

use serde::Serialize;
use tracing::{debug, info, warn};

use gallery_client::dto::UploadReceipt;
use gallery_client::upload::UploadQueue;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::item::{ClipboardMode, ItemRef, Selection};

use crate::confirm::Confirm;
use crate::model::BrowserModel;

/// Result of a [`BrowserModel::delete`] request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The entry was deleted on the backend.
    Deleted(Selection),
    /// The confirmation was declined; nothing was sent.
    Cancelled,
    /// There was no selection.
    NothingSelected,
}

/// What a successful paste did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasteReceipt {
    /// The pasted entry.
    pub item: ItemRef,
    /// Whether it was moved or duplicated.
    pub mode: ClipboardMode,
    /// Where it went.
    pub destination: Scope,
}

impl BrowserModel {
    /// Create a folder inside the current folder and reload the view.
    ///
    /// A blank name is ignored and returns `Ok(None)` without a request.
    pub async fn create_folder(&mut self, name: &str) -> AppResult<Option<FolderId>> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank folder name");
            return Ok(None);
        }

        let created = self.api.create_folder(name, &self.scope).await?;
        info!(
            folder_id = %created.folder_id,
            name = %name,
            parent = %self.scope,
            "Folder created"
        );
        self.reload_after_change(self.scope.clone()).await;
        Ok(Some(created.folder_id))
    }

    /// Delete the selected entry once `confirm` approves.
    ///
    /// Whatever the backend answers for a non-empty folder is returned as is.
    /// When the deleted folder is the current folder or one of its
    /// ancestors, the view moves to the deleted folder's parent.
    pub async fn delete(&mut self, confirm: &dyn Confirm) -> AppResult<DeleteOutcome> {
        let Some(selection) = self.selection.clone() else {
            return Ok(DeleteOutcome::NothingSelected);
        };
        if !confirm.confirm(&format!("Delete \"{}\"?", selection.name)) {
            debug!(item = %selection.item, "Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.api.delete_item(&selection.item).await?;
        info!(item = %selection.item, name = %selection.name, "Deleted");
        self.selection = None;

        let target = match selection.item.as_folder() {
            Some(id) if self.path.contains(id) || self.scope.folder_id() == Some(id) => {
                let parent = self
                    .path
                    .folders()
                    .iter()
                    .find(|f| &f.id == id)
                    .map(|f| f.parent_scope())
                    .unwrap_or(Scope::Root);
                self.index.remove(id);
                parent
            }
            Some(id) => {
                self.index.remove(id);
                self.scope.clone()
            }
            None => self.scope.clone(),
        };
        self.reload_after_change(target).await;
        Ok(DeleteOutcome::Deleted(selection))
    }

    /// Paste the clipboard entry into the current folder.
    ///
    /// `Cut` moves the entry, `Copy` duplicates it. Returns `Ok(None)` with
    /// an empty clipboard. On success both clipboard and selection are
    /// cleared.
    pub async fn paste(&mut self) -> AppResult<Option<PasteReceipt>> {
        let Some(clip) = self.clipboard.clone() else {
            return Ok(None);
        };
        let destination = self.scope.clone();

        if let Some(id) = clip.item.as_folder() {
            if destination.folder_id() == Some(id) || self.path.contains(id) {
                return Err(AppError::validation(format!(
                    "Cannot paste \"{}\" into itself or one of its subfolders",
                    clip.name
                )));
            }
        }

        match clip.mode {
            ClipboardMode::Cut => {
                self.api.move_item(&clip.item, &destination).await?;
                if let Some(id) = clip.item.as_folder() {
                    self.index.reparent(id, destination.folder_id().cloned());
                }
            }
            ClipboardMode::Copy => {
                self.api.copy_item(&clip.item, &destination).await?;
            }
        }
        info!(
            item = %clip.item,
            mode = %clip.mode,
            destination = %destination,
            "Pasted"
        );

        self.clipboard = None;
        self.selection = None;
        self.reload_after_change(destination.clone()).await;
        Ok(Some(PasteReceipt {
            item: clip.item,
            mode: clip.mode,
            destination,
        }))
    }

    /// Upload every queued file into the current folder and reload the view.
    pub async fn upload(&mut self, queue: &mut UploadQueue) -> AppResult<UploadReceipt> {
        let receipt = queue.submit(self.api.as_ref(), &self.scope).await?;
        self.reload_after_change(self.scope.clone()).await;
        Ok(receipt)
    }

    /// Show `target` after a change the backend accepted. On failure the old
    /// listing stays and the view is marked stale.
    async fn reload_after_change(&mut self, target: Scope) {
        if let Err(e) = self.navigate_to(target.clone()).await {
            warn!(scope = %target, error = %e, "Reload after change failed");
            self.stale = true;
        }
    }
}
