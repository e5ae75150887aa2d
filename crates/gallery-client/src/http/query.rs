//! Query-string shapes for scoped listings.
//!
//! Root must stay distinguishable from "no filter": the image listing sends
//! an explicit `folder_id=null`, while the folder listing omits the parameter
//! (which the backend treats as the root).

use gallery_core::types::Scope;

/// Query parameter name shared by both listings.
pub const FOLDER_ID_PARAM: &str = "folder_id";

/// Marker the backend reads as "parent is null".
pub const ROOT_MARKER: &str = "null";

/// Parameters for `GET /folders`.
pub fn folder_listing(scope: &Scope) -> Vec<(&'static str, String)> {
    match scope.folder_id() {
        Some(id) => vec![(FOLDER_ID_PARAM, id.to_string())],
        None => Vec::new(),
    }
}

/// Parameters for `GET /images`.
pub fn image_listing(scope: &Scope) -> Vec<(&'static str, String)> {
    let value = scope
        .folder_id()
        .map_or_else(|| ROOT_MARKER.to_string(), |id| id.to_string());
    vec![(FOLDER_ID_PARAM, value)]
}
