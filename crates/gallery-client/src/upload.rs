//! Pending-file queue behind multi-file upload.
//!
//! Files are collected (and can be removed again) before a single multipart
//! post. There is no retry, chunking, or resumption.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::types::Scope;

use crate::api::GalleryApi;
use crate::dto::{UploadFile, UploadReceipt};

/// A file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    /// Location on disk.
    pub path: PathBuf,
    /// Name sent to the backend.
    pub name: String,
}

impl PendingFile {
    /// Queue a file under its own file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Self { path, name }
    }

    /// MIME type guessed from the file name.
    pub fn content_type(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .to_string()
    }
}

/// Ordered list of files selected for upload. Duplicates are kept, in the
/// order they were added.
#[derive(Debug, Clone, Default)]
pub struct UploadQueue {
    files: Vec<PendingFile>,
}

impl UploadQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file.
    pub fn add(&mut self, path: impl AsRef<Path>) -> &PendingFile {
        self.push(PendingFile::from_path(path.as_ref()))
    }

    /// Append a file with an explicit upload name.
    pub fn add_named(&mut self, path: impl AsRef<Path>, name: impl Into<String>) -> &PendingFile {
        self.push(PendingFile {
            path: path.as_ref().to_path_buf(),
            name: name.into(),
        })
    }

    fn push(&mut self, file: PendingFile) -> &PendingFile {
        debug!(name = %file.name, path = %file.path.display(), "File queued");
        self.files.push(file);
        &self.files[self.files.len() - 1]
    }

    /// Append several files at once (a drop of multiple files).
    pub fn extend<P: AsRef<Path>>(&mut self, paths: impl IntoIterator<Item = P>) {
        for path in paths {
            self.add(path);
        }
    }

    /// Remove the file at `index`.
    pub fn remove(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    /// Drop every queued file.
    pub fn clear(&mut self) {
        self.files.clear();
    }

    /// Queued files in order.
    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    /// Number of queued files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Read every queued file into memory.
    pub async fn read_all(&self) -> AppResult<Vec<UploadFile>> {
        let mut out = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let content = tokio::fs::read(&file.path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read '{}'", file.path.display()),
                    e,
                )
            })?;
            out.push(UploadFile {
                name: file.name.clone(),
                content,
                content_type: file.content_type(),
            });
        }
        Ok(out)
    }

    /// Post all queued files into `destination`. The queue is emptied only
    /// when the backend accepted the upload.
    pub async fn submit<A>(&mut self, api: &A, destination: &Scope) -> AppResult<UploadReceipt>
    where
        A: GalleryApi + ?Sized,
    {
        if self.is_empty() {
            return Err(AppError::validation("No files selected"));
        }
        let files = self.read_all().await?;
        let bytes: usize = files.iter().map(|f| f.content.len()).sum();
        let receipt = api.upload_files(files, destination).await?;
        info!(
            files = self.files.len(),
            bytes = bytes,
            destination = %destination,
            "Upload accepted"
        );
        self.clear();
        Ok(receipt)
    }
}
