//! Browser state and navigation.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use gallery_client::api::GalleryApi;
use gallery_core::config::browser::{BreadcrumbStrategy, BrowserConfig};
use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::folder::{Folder, FolderIndex, FolderPath};
use gallery_entity::image::Image;
use gallery_entity::item::{ClipboardItem, ClipboardMode, ItemKind, ItemRef, Selection};

use crate::navigation::{Listing, NavigationTicket, fetch_listing};

/// Coarse interaction state of a browsing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserPhase {
    /// Nothing selected, clipboard empty.
    Idle,
    /// An entry is selected, clipboard empty.
    Selected,
    /// The clipboard holds an entry awaiting paste.
    Clipped,
}

/// "Where am I": the current folder and the breadcrumb leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrowserContext {
    /// Current folder, `None` at the root.
    pub current_folder: Option<FolderId>,
    /// Top-level folder down to the current folder.
    pub path: FolderPath,
}

impl BrowserContext {
    /// Whether ancestors are missing from the breadcrumb.
    pub fn is_truncated(&self) -> bool {
        self.path.is_truncated()
    }
}

/// Folder/image browser model.
///
/// All mutations go through `&mut self`, so state changes are serialized by
/// construction. Server data is only ever replaced by a fresh listing.
#[derive(Debug)]
pub struct BrowserModel {
    /// Backend.
    pub(crate) api: Arc<dyn GalleryApi>,
    /// Behavior settings.
    pub(crate) config: BrowserConfig,
    /// Scope of the listing currently shown.
    pub(crate) scope: Scope,
    /// Breadcrumb of `scope`.
    pub(crate) path: FolderPath,
    /// Folders in view.
    pub(crate) folders: Vec<Folder>,
    /// Images in view.
    pub(crate) images: Vec<Image>,
    /// Every folder seen this session, for the ancestor walk.
    pub(crate) index: FolderIndex,
    /// Single-slot selection.
    pub(crate) selection: Option<Selection>,
    /// Single-slot clipboard.
    pub(crate) clipboard: Option<ClipboardItem>,
    /// Counter of issued navigations.
    pub(crate) generation: u64,
    /// Set when a reload after an accepted change failed.
    pub(crate) stale: bool,
}

impl BrowserModel {
    /// Create a model at the root. Nothing is fetched until the first
    /// navigation.
    pub fn new(api: Arc<dyn GalleryApi>, config: BrowserConfig) -> Self {
        Self {
            api,
            config,
            scope: Scope::Root,
            path: FolderPath::root(),
            folders: Vec::new(),
            images: Vec::new(),
            index: FolderIndex::new(),
            selection: None,
            clipboard: None,
            generation: 0,
            stale: false,
        }
    }

    /// The backend handle, for fetching listings outside the model.
    pub fn api(&self) -> Arc<dyn GalleryApi> {
        Arc::clone(&self.api)
    }

    /// Scope of the current view.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Current folder id, `None` at the root.
    pub fn current_folder(&self) -> Option<&FolderId> {
        self.scope.folder_id()
    }

    /// Breadcrumb of the current view.
    pub fn path(&self) -> &FolderPath {
        &self.path
    }

    /// Current folder and breadcrumb.
    pub fn context(&self) -> BrowserContext {
        BrowserContext {
            current_folder: self.scope.folder_id().cloned(),
            path: self.path.clone(),
        }
    }

    /// Folders in view.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Images in view.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// The selected entry.
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// The clipboard entry.
    pub fn clipboard(&self) -> Option<&ClipboardItem> {
        self.clipboard.as_ref()
    }

    /// Current interaction state.
    pub fn phase(&self) -> BrowserPhase {
        match (&self.selection, &self.clipboard) {
            (_, Some(_)) => BrowserPhase::Clipped,
            (Some(_), None) => BrowserPhase::Selected,
            (None, None) => BrowserPhase::Idle,
        }
    }

    /// Number of navigations issued so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the listing predates a change the backend has accepted.
    /// Cleared by the next successful navigation or refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Issue a ticket for a navigation to `target`. Any listing for an
    /// older ticket becomes stale.
    pub fn begin_navigation(&mut self, target: impl Into<Scope>) -> NavigationTicket {
        self.generation += 1;
        NavigationTicket {
            generation: self.generation,
            target: target.into(),
        }
    }

    /// Fold a listing into the view.
    ///
    /// Returns `Ok(false)` without touching state when the listing belongs
    /// to a navigation that has since been superseded.
    pub async fn apply_listing(&mut self, listing: Listing) -> AppResult<bool> {
        if listing.ticket.generation != self.generation {
            debug!(
                stale = listing.ticket.generation,
                current = self.generation,
                target = %listing.ticket.target,
                "Discarding stale listing"
            );
            return Ok(false);
        }

        let Listing {
            ticket,
            folders,
            images,
        } = listing;
        self.index.insert_all(&folders);
        self.path = self.rebuild_path(&ticket.target).await;
        self.scope = ticket.target;
        self.folders = folders;
        self.images = images;
        self.stale = false;

        info!(
            scope = %self.scope,
            folders = self.folders.len(),
            images = self.images.len(),
            breadcrumb = %self.path.display(),
            "Navigated"
        );
        Ok(true)
    }

    /// Navigate to a folder (or the root) and load its contents.
    ///
    /// On failure the previous view stays in place.
    pub async fn navigate_to(&mut self, target: impl Into<Scope>) -> AppResult<bool> {
        let ticket = self.begin_navigation(target);
        let listing = fetch_listing(self.api.as_ref(), ticket).await?;
        self.apply_listing(listing).await
    }

    /// Reload the current view.
    pub async fn refresh(&mut self) -> AppResult<bool> {
        self.navigate_to(self.scope.clone()).await
    }

    /// Navigate to the parent of the current folder. No-op at the root.
    pub async fn navigate_up(&mut self) -> AppResult<bool> {
        let Some(current) = self.scope.folder_id() else {
            return Ok(false);
        };
        let parent = self
            .path
            .current()
            .filter(|f| &f.id == current)
            .or_else(|| self.index.get(current))
            .map(|f| f.parent_scope())
            .unwrap_or(Scope::Root);
        self.navigate_to(parent).await
    }

    async fn rebuild_path(&mut self, target: &Scope) -> FolderPath {
        let Some(folder_id) = target.folder_id() else {
            return FolderPath::root();
        };

        let local = self.index.ancestry(folder_id);
        if local.is_complete() {
            return local;
        }
        if self.config.breadcrumb == BreadcrumbStrategy::Walk {
            debug!(folder_id = %folder_id, known = local.len(), "Breadcrumb truncated");
            return local;
        }

        match self.api.folder_breadcrumb(folder_id).await {
            Ok(crumbs) if crumbs.last().is_some_and(|c| &c.id == folder_id) => {
                let resolved = FolderPath::from_crumbs(crumbs);
                self.index.insert_path(&resolved);
                resolved
            }
            Ok(_) => {
                warn!(folder_id = %folder_id, "Backend breadcrumb does not end at the folder");
                local
            }
            Err(e) => {
                warn!(folder_id = %folder_id, error = %e, "Breadcrumb resolution failed");
                local
            }
        }
    }

    /// Select an entry, replacing any previous selection.
    pub fn select(&mut self, item: ItemRef, name: impl Into<String>) -> &Selection {
        let selection = Selection::new(item, name);
        debug!(item = %selection.item, "Selected");
        self.selection.insert(selection)
    }

    /// Select an entry of the current view by kind and id.
    pub fn select_visible(&mut self, kind: ItemKind, id: &str) -> Option<&Selection> {
        let selection = match kind {
            ItemKind::Folder => self
                .folders
                .iter()
                .find(|f| f.id.as_str() == id)
                .map(Selection::from),
            ItemKind::Image => self
                .images
                .iter()
                .find(|i| i.id.as_str() == id)
                .map(Selection::from),
        }?;
        Some(self.select(selection.item, selection.name))
    }

    /// Drop the selection.
    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Put the selection on the clipboard for a duplicate-on-paste.
    pub fn copy(&mut self) -> Option<&ClipboardItem> {
        self.clip(ClipboardMode::Copy)
    }

    /// Put the selection on the clipboard for a move-on-paste.
    pub fn cut(&mut self) -> Option<&ClipboardItem> {
        self.clip(ClipboardMode::Cut)
    }

    fn clip(&mut self, mode: ClipboardMode) -> Option<&ClipboardItem> {
        let selection = self.selection.as_ref()?;
        let item = ClipboardItem::capture(selection, mode);
        debug!(item = %item.item, mode = %mode, "Clipboard set");
        Some(self.clipboard.insert(item))
    }

    /// Empty the clipboard without pasting.
    pub fn clear_clipboard(&mut self) {
        self.clipboard = None;
    }
}
