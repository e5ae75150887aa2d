//! In-memory gallery backend.
//!
//! Behaves like the REST backend (same scoping rules, same error messages)
//! and records every call that reached it, which is what the browser model
//! tests assert against. Calls rejected by the session check are not
//! recorded, exactly as a real request would never have been sent.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, ImageId, Scope};
use gallery_entity::folder::{Crumb, Folder};
use gallery_entity::image::Image;
use gallery_entity::item::ItemRef;

use crate::api::{AuthApi, GalleryApi};
use crate::dto::{CreatedFolder, Credentials, UploadFile, UploadReceipt};
use crate::session::{BearerToken, Session};

/// What the backend does when asked to delete a folder that still has
/// contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FolderDeletePolicy {
    /// Refuse with `409 Folder is not empty`.
    #[default]
    RejectNonEmpty,
    /// Delete the folder with all nested folders and images.
    Cascade,
}

/// One request as the backend saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    /// `GET /folders`
    ListFolders { scope: Scope },
    /// `GET /folders/breadcrumb/{id}`
    Breadcrumb { folder_id: FolderId },
    /// `GET /images`
    ListImages { scope: Scope },
    /// `POST /folders`
    CreateFolder { name: String, parent: Scope },
    /// `DELETE /{kind}/{id}`
    Delete { item: ItemRef },
    /// `PUT /{kind}/{id}/move`
    Move { item: ItemRef, destination: Scope },
    /// `POST /{kind}/{id}/copy`
    Copy { item: ItemRef, destination: Scope },
    /// `POST /upload-multiple`
    Upload {
        file_names: Vec<String>,
        destination: Scope,
    },
    /// `POST /login`
    Login { username: String },
    /// `POST /register`
    Register { username: String },
}

impl ApiCall {
    /// Whether the call changes server state.
    pub fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::ListFolders { .. } | Self::Breadcrumb { .. } | Self::ListImages { .. }
        )
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    folders: Vec<Folder>,
    images: Vec<Image>,
    users: HashMap<String, String>,
    next_id: u64,
    calls: Vec<ApiCall>,
    failures: VecDeque<AppError>,
    delete_policy: FolderDeletePolicy,
    /// Go offline once the next mutation has been applied.
    drop_after_mutation: bool,
    offline: bool,
}

impl MemoryState {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }

    fn folder(&self, id: &FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| &f.id == id)
    }

    fn require_destination(&self, destination: &Scope) -> AppResult<()> {
        match destination.folder_id() {
            Some(id) if self.folder(id).is_none() => {
                Err(AppError::not_found("Destination folder not found"))
            }
            _ => Ok(()),
        }
    }

    /// Whether `candidate` is `ancestor` or lies below it.
    fn is_within(&self, candidate: &FolderId, ancestor: &FolderId) -> bool {
        let mut cursor = Some(candidate.clone());
        let mut steps = 0;
        while let Some(id) = cursor {
            if &id == ancestor {
                return true;
            }
            steps += 1;
            if steps > self.folders.len() {
                return false;
            }
            cursor = self.folder(&id).and_then(|f| f.parent_id.clone());
        }
        false
    }

    fn descendants(&self, root: &FolderId) -> Vec<FolderId> {
        self.folders
            .iter()
            .filter(|f| self.is_within(&f.id, root))
            .map(|f| f.id.clone())
            .collect()
    }

    fn copy_folder(&mut self, source: &FolderId, parent: Option<FolderId>) {
        let Some(original) = self.folder(source).cloned() else {
            return;
        };
        let copy_id = FolderId::new(self.allocate_id());
        self.folders.push(Folder {
            id: copy_id.clone(),
            name: original.name,
            parent_id: parent,
        });

        let images: Vec<Image> = self
            .images
            .iter()
            .filter(|i| i.folder_id.as_ref() == Some(source))
            .cloned()
            .collect();
        for image in images {
            let id = ImageId::new(self.allocate_id());
            self.images.push(Image {
                id,
                folder_id: Some(copy_id.clone()),
                ..image
            });
        }

        let children: Vec<FolderId> = self
            .folders
            .iter()
            .filter(|f| f.parent_id.as_ref() == Some(source))
            .map(|f| f.id.clone())
            .collect();
        for child in children {
            self.copy_folder(&child, Some(copy_id.clone()));
        }
    }
}

/// In-memory [`GalleryApi`] + [`AuthApi`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryGalleryApi {
    state: Arc<Mutex<MemoryState>>,
    session: Session,
}

impl Default for MemoryGalleryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGalleryApi {
    /// Create an empty backend with an already-authenticated session.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            session: Session::authenticated(BearerToken::new("memory-session"), "memory"),
        }
    }

    /// A handle to the same backend data using another session.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            state: Arc::clone(&self.state),
            session,
        }
    }

    /// Choose how non-empty folder deletes are answered.
    pub async fn set_delete_policy(&self, policy: FolderDeletePolicy) {
        self.state.lock().await.delete_policy = policy;
    }

    /// Seed a folder directly (not recorded as a call).
    pub async fn seed_folder(&self, name: &str, parent: Option<&FolderId>) -> Folder {
        let mut state = self.state.lock().await;
        let folder = Folder {
            id: FolderId::new(state.allocate_id()),
            name: name.to_string(),
            parent_id: parent.cloned(),
        };
        state.folders.push(folder.clone());
        folder
    }

    /// Seed an image directly (not recorded as a call).
    pub async fn seed_image(&self, filename: &str, folder: Option<&FolderId>) -> Image {
        let mut state = self.state.lock().await;
        let image = Image {
            id: ImageId::new(state.allocate_id()),
            filename: filename.to_string(),
            url: format!("memory://images/{filename}"),
            upload_date: Some(Utc::now()),
            folder_id: folder.cloned(),
        };
        state.images.push(image.clone());
        image
    }

    /// Make the next call that reaches the backend fail with `error`.
    pub async fn fail_next(&self, error: AppError) {
        self.state.lock().await.failures.push_back(error);
    }

    /// Apply the next mutating call, then refuse every later call with a
    /// network error, like a connection lost right after a write.
    pub async fn drop_connection_after_next_mutation(&self) {
        self.state.lock().await.drop_after_mutation = true;
    }

    /// Every call recorded so far, oldest first.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().await.calls.clone()
    }

    /// Forget the recorded calls.
    pub async fn clear_calls(&self) {
        self.state.lock().await.calls.clear();
    }

    /// All folders currently stored.
    pub async fn folders(&self) -> Vec<Folder> {
        self.state.lock().await.folders.clone()
    }

    /// All images currently stored.
    pub async fn images(&self) -> Vec<Image> {
        self.state.lock().await.images.clone()
    }

    /// Check the session, record the call, and pop an injected failure.
    async fn enter(&self, call: ApiCall) -> AppResult<tokio::sync::MutexGuard<'_, MemoryState>> {
        self.session.bearer()?;
        let mut state = self.state.lock().await;
        if state.offline {
            return Err(AppError::network("Connection lost"));
        }
        if state.drop_after_mutation && call.is_mutation() {
            state.drop_after_mutation = false;
            state.offline = true;
        }
        debug!(?call, "Memory backend call");
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl GalleryApi for MemoryGalleryApi {
    async fn list_folders(&self, scope: &Scope) -> AppResult<Vec<Folder>> {
        let state = self
            .enter(ApiCall::ListFolders {
                scope: scope.clone(),
            })
            .await?;
        Ok(state
            .folders
            .iter()
            .filter(|f| f.parent_id.as_ref() == scope.folder_id())
            .cloned()
            .collect())
    }

    async fn folder_breadcrumb(&self, folder_id: &FolderId) -> AppResult<Vec<Crumb>> {
        let state = self
            .enter(ApiCall::Breadcrumb {
                folder_id: folder_id.clone(),
            })
            .await?;
        let mut crumbs = Vec::new();
        let mut cursor = state.folder(folder_id);
        while let Some(folder) = cursor {
            crumbs.insert(
                0,
                Crumb {
                    id: folder.id.clone(),
                    name: folder.name.clone(),
                },
            );
            if crumbs.len() > state.folders.len() {
                break;
            }
            cursor = folder.parent_id.as_ref().and_then(|p| state.folder(p));
        }
        Ok(crumbs)
    }

    async fn list_images(&self, scope: &Scope) -> AppResult<Vec<Image>> {
        let state = self
            .enter(ApiCall::ListImages {
                scope: scope.clone(),
            })
            .await?;
        Ok(state
            .images
            .iter()
            .filter(|i| i.folder_id.as_ref() == scope.folder_id())
            .cloned()
            .collect())
    }

    async fn create_folder(&self, name: &str, parent: &Scope) -> AppResult<CreatedFolder> {
        let mut state = self
            .enter(ApiCall::CreateFolder {
                name: name.to_string(),
                parent: parent.clone(),
            })
            .await?;
        if name.trim().is_empty() {
            return Err(AppError::validation("Folder name is required"));
        }
        let folder = Folder {
            id: FolderId::new(state.allocate_id()),
            name: name.to_string(),
            parent_id: parent.folder_id().cloned(),
        };
        let folder_id = folder.id.clone();
        state.folders.push(folder);
        Ok(CreatedFolder {
            message: "Folder created successfully".to_string(),
            folder_id,
        })
    }

    async fn delete_item(&self, item: &ItemRef) -> AppResult<()> {
        let mut state = self.enter(ApiCall::Delete { item: item.clone() }).await?;
        match item {
            ItemRef::Image(id) => {
                let before = state.images.len();
                state.images.retain(|i| &i.id != id);
                if state.images.len() == before {
                    return Err(AppError::not_found("Image not found"));
                }
            }
            ItemRef::Folder(id) => {
                if state.folder(id).is_none() {
                    return Err(AppError::not_found("Folder not found"));
                }
                let doomed = state.descendants(id);
                let non_empty = doomed.len() > 1
                    || state.images.iter().any(|i| i.folder_id.as_ref() == Some(id));
                if non_empty && state.delete_policy == FolderDeletePolicy::RejectNonEmpty {
                    return Err(AppError::conflict("Folder is not empty"));
                }
                state.folders.retain(|f| !doomed.contains(&f.id));
                state
                    .images
                    .retain(|i| i.folder_id.as_ref().is_none_or(|f| !doomed.contains(f)));
                info!(folder_id = %id, removed = doomed.len(), "Folder deleted");
            }
        }
        Ok(())
    }

    async fn move_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()> {
        let mut state = self
            .enter(ApiCall::Move {
                item: item.clone(),
                destination: destination.clone(),
            })
            .await?;
        state.require_destination(destination)?;
        let target = destination.folder_id().cloned();
        match item {
            ItemRef::Image(id) => {
                let image = state
                    .images
                    .iter_mut()
                    .find(|i| &i.id == id)
                    .ok_or_else(|| AppError::not_found("Image not found"))?;
                image.folder_id = target;
            }
            ItemRef::Folder(id) => {
                if state.folder(id).is_none() {
                    return Err(AppError::not_found("Folder not found"));
                }
                if let Some(dest) = &target {
                    if state.is_within(dest, id) {
                        return Err(AppError::validation(
                            "Cannot move a folder into itself or its own subfolder",
                        ));
                    }
                }
                if let Some(folder) = state.folders.iter_mut().find(|f| &f.id == id) {
                    folder.parent_id = target;
                }
            }
        }
        Ok(())
    }

    async fn copy_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()> {
        let mut state = self
            .enter(ApiCall::Copy {
                item: item.clone(),
                destination: destination.clone(),
            })
            .await?;
        state.require_destination(destination)?;
        let target = destination.folder_id().cloned();
        match item {
            ItemRef::Image(id) => {
                let original = state
                    .images
                    .iter()
                    .find(|i| &i.id == id)
                    .cloned()
                    .ok_or_else(|| AppError::not_found("Image not found"))?;
                let new_id = ImageId::new(state.allocate_id());
                state.images.push(Image {
                    id: new_id,
                    folder_id: target,
                    upload_date: Some(Utc::now()),
                    ..original
                });
            }
            ItemRef::Folder(id) => {
                if state.folder(id).is_none() {
                    return Err(AppError::not_found("Folder not found"));
                }
                if let Some(dest) = &target {
                    if state.is_within(dest, id) {
                        return Err(AppError::validation(
                            "Cannot copy a folder into itself or its own subfolder",
                        ));
                    }
                }
                state.copy_folder(id, target);
            }
        }
        Ok(())
    }

    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        destination: &Scope,
    ) -> AppResult<UploadReceipt> {
        let mut state = self
            .enter(ApiCall::Upload {
                file_names: files.iter().map(|f| f.name.clone()).collect(),
                destination: destination.clone(),
            })
            .await?;
        if files.is_empty() {
            return Err(AppError::validation("No files provided"));
        }
        state.require_destination(destination)?;

        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            let url = format!("memory://images/{}", file.name);
            let image = Image {
                id: ImageId::new(state.allocate_id()),
                filename: file.name,
                url: url.clone(),
                upload_date: Some(Utc::now()),
                folder_id: destination.folder_id().cloned(),
            };
            state.images.push(image);
            urls.push(url);
        }
        Ok(UploadReceipt {
            message: "Images uploaded successfully".to_string(),
            urls,
        })
    }
}

#[async_trait]
impl AuthApi for MemoryGalleryApi {
    async fn login(&self, credentials: &Credentials) -> AppResult<BearerToken> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Login {
            username: credentials.username.clone(),
        });
        match state.users.get(&credentials.username) {
            Some(password) if password == &credentials.password => Ok(BearerToken::new(format!(
                "memory-token-{}",
                credentials.username
            ))),
            _ => Err(AppError::authentication("Invalid username or password")),
        }
    }

    async fn register(&self, credentials: &Credentials) -> AppResult<String> {
        let mut state = self.state.lock().await;
        state.calls.push(ApiCall::Register {
            username: credentials.username.clone(),
        });
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AppError::validation("Username and password required"));
        }
        if state.users.contains_key(&credentials.username) {
            return Err(AppError::conflict("Username already exists"));
        }
        state
            .users
            .insert(credentials.username.clone(), credentials.password.clone());
        Ok("User registered successfully".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::error::ErrorKind;

    #[tokio::test]
    async fn test_scoped_listings() {
        let api = MemoryGalleryApi::new();
        let trip = api.seed_folder("Trip", None).await;
        api.seed_folder("Day 1", Some(&trip.id)).await;
        api.seed_image("root.jpg", None).await;
        api.seed_image("inside.jpg", Some(&trip.id)).await;

        let root_folders = api.list_folders(&Scope::Root).await.expect("folders");
        assert_eq!(root_folders.len(), 1);
        let root_images = api.list_images(&Scope::Root).await.expect("images");
        assert_eq!(root_images[0].filename, "root.jpg");

        let inner = api.list_images(&trip.scope()).await.expect("images");
        assert_eq!(inner[0].filename, "inside.jpg");
    }

    #[tokio::test]
    async fn test_delete_policy_contract() {
        let api = MemoryGalleryApi::new();
        let trip = api.seed_folder("Trip", None).await;
        api.seed_image("inside.jpg", Some(&trip.id)).await;

        let err = api
            .delete_item(&ItemRef::Folder(trip.id.clone()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(api.folders().await.len(), 1);

        api.set_delete_policy(FolderDeletePolicy::Cascade).await;
        api.delete_item(&ItemRef::Folder(trip.id.clone()))
            .await
            .expect("cascade");
        assert!(api.folders().await.is_empty());
        assert!(api.images().await.is_empty());
    }

    #[tokio::test]
    async fn test_folder_copy_is_deep() {
        let api = MemoryGalleryApi::new();
        let trip = api.seed_folder("Trip", None).await;
        let day = api.seed_folder("Day 1", Some(&trip.id)).await;
        api.seed_image("a.jpg", Some(&day.id)).await;
        let archive = api.seed_folder("Archive", None).await;

        api.copy_item(&ItemRef::Folder(trip.id.clone()), &archive.scope())
            .await
            .expect("copy");

        assert_eq!(api.folders().await.len(), 5);
        assert_eq!(api.images().await.len(), 2);
        let copied = api.list_folders(&archive.scope()).await.expect("list");
        assert_eq!(copied[0].name, "Trip");
        assert_ne!(copied[0].id, trip.id);
    }

    #[tokio::test]
    async fn test_move_into_descendant_rejected() {
        let api = MemoryGalleryApi::new();
        let trip = api.seed_folder("Trip", None).await;
        let day = api.seed_folder("Day 1", Some(&trip.id)).await;

        let err = api
            .move_item(&ItemRef::Folder(trip.id.clone()), &day.scope())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unauthenticated_handle_records_nothing() {
        let api = MemoryGalleryApi::new();
        let anon = api.with_session(Session::anonymous());

        let err = anon.list_folders(&Scope::Root).await.unwrap_err();
        assert!(err.is_unauthenticated());
        assert!(api.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_is_returned_once() {
        let api = MemoryGalleryApi::new();
        api.fail_next(AppError::network("offline")).await;

        assert!(api.list_images(&Scope::Root).await.is_err());
        assert!(api.list_images(&Scope::Root).await.is_ok());
        assert_eq!(api.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_connection_drops_after_mutation() {
        let api = MemoryGalleryApi::new();
        let image = api.seed_image("a.jpg", None).await;
        api.drop_connection_after_next_mutation().await;

        api.list_images(&Scope::Root).await.expect("reads still work");
        api.delete_item(&ItemRef::Image(image.id.clone()))
            .await
            .expect("mutation applied");

        let err = api.list_images(&Scope::Root).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Network);
        assert!(api.images().await.is_empty());
        assert_eq!(api.calls().await.len(), 2);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let api = MemoryGalleryApi::new();
        let creds = Credentials::new("ana", "secret");
        api.register(&creds).await.expect("register");
        assert_eq!(
            api.register(&creds).await.unwrap_err().kind,
            ErrorKind::Conflict
        );

        let token = api.login(&creds).await.expect("login");
        assert_eq!(token.as_str(), "memory-token-ana");
        let err = api
            .login(&Credentials::new("ana", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.message, "Invalid username or password");
    }
}
