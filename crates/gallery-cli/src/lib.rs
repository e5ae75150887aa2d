//! # gallery-cli
//!
//! Terminal output shared by the `gallery-cli` commands and the interactive
//! `gallery` shell.

pub mod output;
