//! Folder domain entities.

pub mod model;
pub mod path;

pub use model::Folder;
pub use path::{Crumb, FolderIndex, FolderPath};
