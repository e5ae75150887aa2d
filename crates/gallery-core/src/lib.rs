//! # gallery-core
//!
//! Core crate for the photo gallery client. Contains configuration schemas,
//! typed identifiers, the folder scope type, and the unified error system.
//!
//! This crate has **no** internal dependencies on other gallery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
