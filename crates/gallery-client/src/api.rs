//! Backend contract consumed by the browser model and the CLI.

use async_trait::async_trait;

use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::folder::{Crumb, Folder};
use gallery_entity::image::Image;
use gallery_entity::item::ItemRef;

use crate::dto::{CreatedFolder, Credentials, UploadFile, UploadReceipt};
use crate::session::BearerToken;

/// Authenticated folder/image operations.
///
/// Every method either returns the backend's answer or an [`AppError`]
/// carrying the backend's message. Implementations never retry.
///
/// [`AppError`]: gallery_core::error::AppError
#[async_trait]
pub trait GalleryApi: Send + Sync + std::fmt::Debug + 'static {
    /// List the folders directly inside `scope`.
    async fn list_folders(&self, scope: &Scope) -> AppResult<Vec<Folder>>;

    /// Fetch the ancestor chain of a folder, top-down, ending with the
    /// folder itself.
    async fn folder_breadcrumb(&self, folder_id: &FolderId) -> AppResult<Vec<Crumb>>;

    /// List the images directly inside `scope`.
    async fn list_images(&self, scope: &Scope) -> AppResult<Vec<Image>>;

    /// Create a folder under `parent`.
    async fn create_folder(&self, name: &str, parent: &Scope) -> AppResult<CreatedFolder>;

    /// Delete a folder or an image.
    async fn delete_item(&self, item: &ItemRef) -> AppResult<()>;

    /// Reparent a folder or an image.
    async fn move_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()>;

    /// Insert a duplicate of a folder or an image under `destination`.
    async fn copy_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()>;

    /// Upload several files into `destination` in one multipart request.
    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        destination: &Scope,
    ) -> AppResult<UploadReceipt>;
}

/// Unauthenticated account operations.
#[async_trait]
pub trait AuthApi: Send + Sync + std::fmt::Debug + 'static {
    /// Exchange credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> AppResult<BearerToken>;

    /// Create an account; returns the backend's confirmation message.
    async fn register(&self, credentials: &Credentials) -> AppResult<String>;
}
