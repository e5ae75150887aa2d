//! Generation-tagged navigation.
//!
//! A navigation is split in three steps so the network part never needs the
//! model: [`BrowserModel::begin_navigation`] hands out a ticket,
//! [`fetch_listing`] runs both listings concurrently, and
//! [`BrowserModel::apply_listing`] folds the result in only if no newer
//! navigation has started since.
//!
//! [`BrowserModel::begin_navigation`]: crate::model::BrowserModel::begin_navigation
//! [`BrowserModel::apply_listing`]: crate::model::BrowserModel::apply_listing

use futures::future::try_join;
use tracing::debug;

use gallery_client::api::GalleryApi;
use gallery_core::result::AppResult;
use gallery_core::types::Scope;
use gallery_entity::folder::Folder;
use gallery_entity::image::Image;

/// Identifies one navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTicket {
    /// Monotonic navigation counter value at issue time.
    pub generation: u64,
    /// Where the navigation is going.
    pub target: Scope,
}

/// Both listings of one navigation.
#[derive(Debug, Clone)]
pub struct Listing {
    /// The navigation this listing answers.
    pub ticket: NavigationTicket,
    /// Folders directly inside the target.
    pub folders: Vec<Folder>,
    /// Images directly inside the target.
    pub images: Vec<Image>,
}

/// Fetch folders and images for a ticket. The two requests run concurrently
/// and both must succeed.
pub async fn fetch_listing(api: &dyn GalleryApi, ticket: NavigationTicket) -> AppResult<Listing> {
    debug!(generation = ticket.generation, target = %ticket.target, "Fetching listing");
    let (folders, images) =
        try_join(api.list_folders(&ticket.target), api.list_images(&ticket.target)).await?;
    Ok(Listing {
        ticket,
        folders,
        images,
    })
}
