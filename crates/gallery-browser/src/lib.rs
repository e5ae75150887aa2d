//! # gallery-browser
//!
//! The folder/image browser model: where the user is, what is in view, the
//! breadcrumb, the single selection, and the clipboard. All server state is
//! refetched after every mutation; nothing is applied optimistically, so a
//! failed call leaves the model exactly as it was.

pub mod actions;
pub mod confirm;
pub mod model;
pub mod navigation;

pub use actions::{DeleteOutcome, PasteReceipt};
pub use confirm::Confirm;
pub use model::{BrowserContext, BrowserModel, BrowserPhase};
pub use navigation::{Listing, NavigationTicket};
