//! # gallery-entity
//!
//! Domain entity models for the gallery client: server-owned folders and
//! images, plus the client-side selection and clipboard value objects.

pub mod folder;
pub mod image;
pub mod item;
