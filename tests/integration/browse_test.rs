//! End-to-end browsing flows against the in-memory backend.

use gallery_browser::{BrowserPhase, DeleteOutcome};
use gallery_client::memory::{ApiCall, FolderDeletePolicy, MemoryGalleryApi};
use gallery_client::UploadQueue;
use gallery_core::config::browser::BreadcrumbStrategy;
use gallery_core::types::Scope;
use gallery_entity::item::{ClipboardMode, ItemKind, ItemRef};

use crate::helpers;

#[tokio::test]
async fn test_create_navigate_cut_paste_to_root() {
    let api = MemoryGalleryApi::new();
    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(Scope::Root).await.expect("root");

    let vacation = browser
        .create_folder("Vacation")
        .await
        .expect("create")
        .expect("folder id");
    let img1 = api.seed_image("img1.jpg", Some(&vacation)).await;

    browser.navigate_to(vacation.clone()).await.expect("enter");
    assert_eq!(browser.path().display(), "/Vacation");

    browser
        .select_visible(ItemKind::Image, img1.id.as_str())
        .expect("image in view");
    browser.cut().expect("cut");
    browser.navigate_to(Scope::Root).await.expect("back to root");
    api.clear_calls().await;

    let receipt = browser.paste().await.expect("paste").expect("pasted");
    assert_eq!(receipt.mode, ClipboardMode::Cut);

    let calls = api.calls().await;
    assert_eq!(
        calls[0],
        ApiCall::Move {
            item: ItemRef::Image(img1.id.clone()),
            destination: Scope::Root,
        }
    );
    assert!(calls.contains(&ApiCall::ListImages { scope: Scope::Root }));
    assert!(browser.clipboard().is_none());
    assert!(browser.selection().is_none());
    assert_eq!(browser.phase(), BrowserPhase::Idle);
    assert!(browser.images().iter().any(|i| i.id == img1.id));
}

#[tokio::test]
async fn test_walk_down_and_up_keeps_breadcrumb() {
    let api = MemoryGalleryApi::new();
    let photos = api.seed_folder("Photos", None).await;
    let year = api.seed_folder("2024", Some(&photos.id)).await;
    let summer = api.seed_folder("Summer", Some(&year.id)).await;

    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(Scope::Root).await.expect("root");
    browser.navigate_to(photos.id.clone()).await.expect("photos");
    browser.navigate_to(year.id.clone()).await.expect("year");
    browser.navigate_to(summer.id.clone()).await.expect("summer");
    assert_eq!(browser.path().display(), "/Photos/2024/Summer");

    browser.navigate_up().await.expect("up");
    assert_eq!(browser.current_folder(), Some(&year.id));
    assert_eq!(browser.path().display(), "/Photos/2024");

    browser.navigate_up().await.expect("up");
    browser.navigate_up().await.expect("up");
    assert_eq!(browser.scope(), &Scope::Root);
    assert!(!browser.navigate_up().await.expect("noop at root"));
}

#[tokio::test]
async fn test_selection_and_clipboard_survive_navigation() {
    let api = MemoryGalleryApi::new();
    let trip = api.seed_folder("Trip", None).await;
    let other = api.seed_folder("Other", None).await;

    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(Scope::Root).await.expect("root");
    browser
        .select_visible(ItemKind::Folder, trip.id.as_str())
        .expect("trip");
    browser.copy().expect("copy");

    browser.navigate_to(other.id.clone()).await.expect("other");
    assert_eq!(
        browser.selection().map(|s| s.item.clone()),
        Some(ItemRef::Folder(trip.id.clone()))
    );
    assert_eq!(browser.phase(), BrowserPhase::Clipped);

    let receipt = browser.paste().await.expect("paste").expect("pasted");
    assert_eq!(receipt.destination, Scope::Folder(other.id.clone()));
    assert_eq!(browser.folders().len(), 1);
    assert_eq!(browser.folders()[0].name, "Trip");
    assert_ne!(browser.folders()[0].id, trip.id);
}

#[tokio::test]
async fn test_copied_folder_brings_its_contents() {
    let api = MemoryGalleryApi::new();
    let trip = api.seed_folder("Trip", None).await;
    api.seed_image("beach.jpg", Some(&trip.id)).await;
    let archive = api.seed_folder("Archive", None).await;

    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.select(ItemRef::Folder(trip.id.clone()), "Trip");
    browser.copy();
    browser.navigate_to(archive.id.clone()).await.expect("archive");
    browser.paste().await.expect("paste");

    let copy = browser.folders()[0].id.clone();
    browser.navigate_to(copy).await.expect("enter copy");
    assert_eq!(browser.images().len(), 1);
    assert_eq!(browser.images()[0].filename, "beach.jpg");
    assert_eq!(api.images().await.len(), 2);
}

#[tokio::test]
async fn test_declined_delete_then_confirmed_delete() {
    let api = MemoryGalleryApi::new();
    let image = api.seed_image("old.jpg", None).await;

    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(Scope::Root).await.expect("root");
    browser
        .select_visible(ItemKind::Image, image.id.as_str())
        .expect("image");
    api.clear_calls().await;

    let declined = browser.delete(&|_: &str| false).await.expect("declined");
    assert_eq!(declined, DeleteOutcome::Cancelled);
    assert!(api.calls().await.is_empty());

    let deleted = browser.delete(&|_: &str| true).await.expect("deleted");
    assert!(matches!(deleted, DeleteOutcome::Deleted(_)));
    assert!(browser.images().is_empty());
    assert_eq!(
        api.calls().await[0],
        ApiCall::Delete {
            item: ItemRef::Image(image.id.clone()),
        }
    );
}

#[tokio::test]
async fn test_cascade_policy_removes_subtree() {
    let api = MemoryGalleryApi::new();
    api.set_delete_policy(FolderDeletePolicy::Cascade).await;
    let trip = api.seed_folder("Trip", None).await;
    let day = api.seed_folder("Day 1", Some(&trip.id)).await;
    api.seed_image("beach.jpg", Some(&day.id)).await;

    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(Scope::Root).await.expect("root");
    browser
        .select_visible(ItemKind::Folder, trip.id.as_str())
        .expect("trip");
    browser.delete(&|_: &str| true).await.expect("deleted");

    assert!(browser.folders().is_empty());
    assert!(api.folders().await.is_empty());
    assert!(api.images().await.is_empty());
}

#[tokio::test]
async fn test_upload_lands_in_current_folder() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("one.jpg");
    let second = dir.path().join("two.png");
    tokio::fs::write(&first, b"jpeg").await.expect("write");
    tokio::fs::write(&second, b"png").await.expect("write");

    let api = MemoryGalleryApi::new();
    let trip = api.seed_folder("Trip", None).await;
    let mut browser = helpers::browser(api.clone(), BreadcrumbStrategy::Walk);
    browser.navigate_to(trip.id.clone()).await.expect("trip");

    let mut queue = UploadQueue::new();
    queue.extend([&first, &second]);
    let receipt = browser.upload(&mut queue).await.expect("upload");

    assert_eq!(receipt.urls.len(), 2);
    assert!(queue.is_empty());
    let names: Vec<_> = browser.images().iter().map(|i| i.filename.as_str()).collect();
    assert_eq!(names, vec!["one.jpg", "two.png"]);
}
