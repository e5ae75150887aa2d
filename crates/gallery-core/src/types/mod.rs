//! Shared value types used across the gallery crates.

pub mod id;
pub mod scope;

pub use id::{FolderId, ImageId};
pub use scope::Scope;
