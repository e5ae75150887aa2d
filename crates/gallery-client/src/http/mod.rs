//! reqwest implementation of the backend contract.

pub mod query;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use gallery_core::config::api::ApiConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::folder::{Crumb, Folder};
use gallery_entity::image::Image;
use gallery_entity::item::ItemRef;

use crate::api::{AuthApi, GalleryApi};
use crate::dto::{
    CreateFolderRequest, CreatedFolder, Credentials, LoginResponse, MessageResponse,
    ReparentRequest, UploadFile, UploadReceipt,
};
use crate::session::{BearerToken, Session};

/// HTTP client for the gallery backend.
///
/// The session is fixed at construction; build a new client (see
/// [`HttpGalleryClient::with_session`]) after login or logout.
#[derive(Debug, Clone)]
pub struct HttpGalleryClient {
    /// Shared connection pool.
    http: reqwest::Client,
    /// Base URL without a trailing slash.
    base_url: String,
    /// Login/register path prefix.
    auth_prefix: String,
    /// Bearer token holder.
    session: Session,
}

impl HttpGalleryClient {
    /// Create a client from configuration and an explicit session.
    pub fn new(config: &ApiConfig, session: Session) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to build HTTP client: {e}"),
                e,
            )
        })?;

        Url::parse(&config.base_url).map_err(|e| {
            AppError::configuration(format!("Invalid API base URL '{}': {e}", config.base_url))
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth_prefix: normalize_prefix(&config.auth_prefix),
            session,
        })
    }

    /// The session this client authenticates with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A client sharing the connection pool but using another session.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            auth_prefix: self.auth_prefix.clone(),
            session,
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> AppResult<Url> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AppError::internal(format!("Invalid request URL '{path}': {e}")))?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Start an authenticated request. Fails before anything is sent when
    /// the session has no usable token.
    fn authorized(&self, method: Method, url: Url) -> AppResult<RequestBuilder> {
        let token = self.session.bearer()?;
        Ok(self.http.request(method, url).bearer_auth(token.as_str()))
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> AppResult<Response> {
        let response = builder.send().await.map_err(|e| {
            warn!(operation = operation, error = %e, "Request did not complete");
            transport_error(operation, e)
        })?;
        check_status(response, operation).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        operation: &str,
    ) -> AppResult<T> {
        let response = self.send(builder, operation).await?;
        response.json::<T>().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Serialization,
                format!("Unexpected response body for {operation}: {e}"),
                e,
            )
        })
    }

    async fn reparent(
        &self,
        item: &ItemRef,
        destination: &Scope,
        method: Method,
        action: &str,
    ) -> AppResult<()> {
        let path = format!("/{}/{}/{}", item.kind().collection(), item.id(), action);
        let body = ReparentRequest {
            parent_id: destination.folder_id().cloned(),
        };
        let request = self.authorized(method, self.url(&path, &[])?)?.json(&body);
        self.send(request, action).await?;
        info!(item = %item, destination = %destination, action = action, "Item reparented");
        Ok(())
    }
}

#[async_trait]
impl GalleryApi for HttpGalleryClient {
    async fn list_folders(&self, scope: &Scope) -> AppResult<Vec<Folder>> {
        let url = self.url("/folders", &query::folder_listing(scope))?;
        debug!(%url, "Listing folders");
        self.send_json(self.authorized(Method::GET, url)?, "list folders")
            .await
    }

    async fn folder_breadcrumb(&self, folder_id: &FolderId) -> AppResult<Vec<Crumb>> {
        let url = self.url(&format!("/folders/breadcrumb/{folder_id}"), &[])?;
        debug!(%url, "Resolving breadcrumb");
        self.send_json(self.authorized(Method::GET, url)?, "resolve breadcrumb")
            .await
    }

    async fn list_images(&self, scope: &Scope) -> AppResult<Vec<Image>> {
        let url = self.url("/images", &query::image_listing(scope))?;
        debug!(%url, "Listing images");
        self.send_json(self.authorized(Method::GET, url)?, "list images")
            .await
    }

    async fn create_folder(&self, name: &str, parent: &Scope) -> AppResult<CreatedFolder> {
        let body = CreateFolderRequest {
            name: name.to_string(),
            parent_id: parent.folder_id().cloned(),
        };
        let request = self
            .authorized(Method::POST, self.url("/folders", &[])?)?
            .json(&body);
        let created: CreatedFolder = self.send_json(request, "create folder").await?;
        info!(folder_id = %created.folder_id, parent = %parent, "Folder created");
        Ok(created)
    }

    async fn delete_item(&self, item: &ItemRef) -> AppResult<()> {
        let path = format!("/{}/{}", item.kind().collection(), item.id());
        let request = self.authorized(Method::DELETE, self.url(&path, &[])?)?;
        self.send(request, "delete").await?;
        info!(item = %item, "Item deleted");
        Ok(())
    }

    async fn move_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()> {
        self.reparent(item, destination, Method::PUT, "move").await
    }

    async fn copy_item(&self, item: &ItemRef, destination: &Scope) -> AppResult<()> {
        self.reparent(item, destination, Method::POST, "copy").await
    }

    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        destination: &Scope,
    ) -> AppResult<UploadReceipt> {
        let count = files.len();
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.content)
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    AppError::validation(format!(
                        "Invalid content type '{}' for '{}': {e}",
                        file.content_type, file.name
                    ))
                })?;
            form = form.part("files", part);
        }
        if let Some(folder_id) = destination.folder_id() {
            form = form.text("folder_id", folder_id.to_string());
        }

        let request = self
            .authorized(Method::POST, self.url("/upload-multiple", &[])?)?
            .multipart(form);
        let receipt: UploadReceipt = self.send_json(request, "upload").await?;
        info!(files = count, destination = %destination, "Files uploaded");
        Ok(receipt)
    }
}

#[async_trait]
impl AuthApi for HttpGalleryClient {
    async fn login(&self, credentials: &Credentials) -> AppResult<BearerToken> {
        let url = self.url(&format!("{}/login", self.auth_prefix), &[])?;
        let request = self.http.post(url).json(credentials);
        let response: LoginResponse = self.send_json(request, "login").await?;
        info!(username = %credentials.username, "Logged in");
        Ok(BearerToken::new(response.token))
    }

    async fn register(&self, credentials: &Credentials) -> AppResult<String> {
        let url = self.url(&format!("{}/register", self.auth_prefix), &[])?;
        let request = self.http.post(url).json(credentials);
        let response: MessageResponse = self.send_json(request, "register").await?;
        info!(username = %credentials.username, "Account registered");
        Ok(response
            .message
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }
}

/// Map a non-success response to an [`AppError`], keeping the backend's
/// `message` when the body carries one.
async fn check_status(response: Response, operation: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&body)
        .ok()
        .and_then(|b| b.message);
    warn!(
        operation = operation,
        status = status.as_u16(),
        message = message.as_deref().unwrap_or(""),
        "Backend rejected request"
    );
    Err(AppError::from_response(status.as_u16(), message))
}

fn transport_error(operation: &str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("{operation} timed out")
    } else {
        format!("{operation} failed: could not reach the server")
    };
    AppError::with_source(ErrorKind::Network, message, err)
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() || trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
