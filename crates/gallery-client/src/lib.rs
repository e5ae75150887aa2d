//! # gallery-client
//!
//! Everything the browser model needs to talk to the gallery backend:
//!
//! - [`GalleryApi`] / [`AuthApi`]: the backend contract
//! - [`HttpGalleryClient`]: the reqwest implementation
//! - `MemoryGalleryApi` (feature `memory`): an in-memory backend that
//!   records every call
//! - [`session`]: bearer token and its persistence
//! - [`upload`]: the pending-file queue behind multi-file upload

pub mod api;
pub mod dto;
pub mod http;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod session;
pub mod upload;

pub use api::{AuthApi, GalleryApi};
pub use http::HttpGalleryClient;
#[cfg(any(test, feature = "memory"))]
pub use memory::{ApiCall, FolderDeletePolicy, MemoryGalleryApi};
pub use session::{BearerToken, Session};
pub use upload::UploadQueue;
