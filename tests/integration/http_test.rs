//! Wire-level behavior of the reqwest client against a stub backend.

use serde_json::json;

use gallery_client::session::Session;
use gallery_client::{GalleryApi, HttpGalleryClient, UploadQueue};
use gallery_core::config::browser::BreadcrumbStrategy;
use gallery_core::error::ErrorKind;
use gallery_core::types::{FolderId, Scope};
use gallery_entity::item::{ItemKind, ItemRef};

use crate::helpers::{self, StubBackend};

#[tokio::test]
async fn test_root_listing_is_explicitly_scoped() {
    let backend = StubBackend::start().await;
    let mut browser = helpers::browser(backend.client(), BreadcrumbStrategy::Resolve);

    browser.navigate_to(Scope::Root).await.expect("root");

    let requests = backend.requests().await;
    let targets: Vec<_> = requests.iter().map(|r| r.target.as_str()).collect();
    assert!(targets.contains(&"/folders"));
    assert!(targets.contains(&"/images?folder_id=null"));
    assert!(
        requests
            .iter()
            .all(|r| r.header("authorization").is_some_and(|h| h.starts_with("Bearer ")))
    );
}

#[tokio::test]
async fn test_folder_listing_and_breadcrumb() {
    let backend = StubBackend::start().await;
    backend
        .route(
            "GET",
            "/folders/breadcrumb/12",
            200,
            json!([{"id": 3, "name": "Photos"}, {"id": 12, "name": "2024"}]),
        )
        .await;
    backend
        .route(
            "GET",
            "/images",
            200,
            json!([{
                "id": 40,
                "filename": "beach.jpg",
                "url": "http://cdn.test/beach.jpg",
                "upload_date": "Mon, 01 Jul 2024 10:00:00 GMT",
                "folder_id": 12
            }]),
        )
        .await;
    let mut browser = helpers::browser(backend.client(), BreadcrumbStrategy::Resolve);

    browser
        .navigate_to(FolderId::new("12"))
        .await
        .expect("deep link");

    let targets: Vec<_> = backend
        .requests()
        .await
        .into_iter()
        .map(|r| r.target)
        .collect();
    assert!(targets.contains(&"/folders?folder_id=12".to_string()));
    assert!(targets.contains(&"/images?folder_id=12".to_string()));
    assert_eq!(browser.path().display(), "/Photos/2024");
    assert_eq!(browser.images()[0].id.as_str(), "40");
    assert_eq!(browser.images()[0].folder_id, Some(FolderId::new("12")));
}

#[tokio::test]
async fn test_cut_paste_to_root_sends_null_parent() {
    let backend = StubBackend::start().await;
    backend
        .route(
            "GET",
            "/images",
            200,
            json!([{
                "id": 1,
                "filename": "img1.jpg",
                "url": "http://cdn.test/img1.jpg",
                "upload_date": "2024-07-01T10:00:00Z",
                "folder_id": 5
            }]),
        )
        .await;
    backend
        .route("PUT", "/images/1/move", 200, json!({"message": "Image moved"}))
        .await;
    let mut browser = helpers::browser(backend.client(), BreadcrumbStrategy::Walk);

    browser.navigate_to(FolderId::new("5")).await.expect("folder");
    browser.select_visible(ItemKind::Image, "1").expect("image");
    browser.cut();
    browser.navigate_to(Scope::Root).await.expect("root");
    browser.paste().await.expect("paste");

    let requests = backend.requests().await;
    let moved = requests
        .iter()
        .find(|r| r.method == "PUT")
        .expect("move request");
    assert_eq!(moved.target, "/images/1/move");
    assert_eq!(moved.json(), json!({"parent_id": null}));
    assert!(browser.clipboard().is_none());
    assert!(browser.selection().is_none());
}

#[tokio::test]
async fn test_copy_uses_copy_endpoint() {
    let backend = StubBackend::start().await;
    backend
        .route("POST", "/folders/8/copy", 200, json!({"message": "Folder copied"}))
        .await;
    let client = backend.client();

    client
        .copy_item(&ItemRef::Folder(FolderId::new("8")), &Scope::from(FolderId::new("2")))
        .await
        .expect("copy");

    let requests = backend.requests().await;
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].target, "/folders/8/copy");
    assert_eq!(requests[0].json(), json!({"parent_id": "2"}));
}

#[tokio::test]
async fn test_backend_message_is_surfaced_verbatim() {
    let backend = StubBackend::start().await;
    backend
        .route(
            "DELETE",
            "/folders/3",
            409,
            json!({"message": "Folder is not empty"}),
        )
        .await;
    backend.route("DELETE", "/images/4", 500, json!({})).await;
    let client = backend.client();

    let err = client
        .delete_item(&ItemRef::Folder(FolderId::new("3")))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(err.message, "Folder is not empty");

    let err = client
        .delete_item(&ItemRef::new(ItemKind::Image, "4"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
    assert_eq!(err.message, "Request failed with status 500");
}

#[tokio::test]
async fn test_create_folder_posts_parent() {
    let backend = StubBackend::start().await;
    backend
        .route(
            "POST",
            "/folders",
            201,
            json!({"message": "Folder created successfully", "folder_id": 21}),
        )
        .await;
    let client = backend.client();

    let created = client
        .create_folder("Vacation", &Scope::Root)
        .await
        .expect("created");

    assert_eq!(created.folder_id, FolderId::new("21"));
    let requests = backend.requests().await;
    assert_eq!(
        requests[0].json(),
        json!({"name": "Vacation", "parent_id": null})
    );
}

#[tokio::test]
async fn test_upload_is_one_multipart_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("one.jpg");
    let second = dir.path().join("two.png");
    tokio::fs::write(&first, b"jpeg-bytes").await.expect("write");
    tokio::fs::write(&second, b"png-bytes").await.expect("write");

    let backend = StubBackend::start().await;
    backend
        .route(
            "POST",
            "/upload-multiple",
            200,
            json!({"message": "Images uploaded successfully", "urls": ["u1", "u2"]}),
        )
        .await;
    let client = backend.client();

    let mut queue = UploadQueue::new();
    queue.extend([&first, &second]);
    let receipt = queue
        .submit(&client, &Scope::from(FolderId::new("4")))
        .await
        .expect("upload");

    assert_eq!(receipt.urls, vec!["u1", "u2"]);
    let requests = backend.requests().await;
    assert_eq!(requests.len(), 1);
    let upload = &requests[0];
    assert!(
        upload
            .header("content-type")
            .is_some_and(|v| v.starts_with("multipart/form-data"))
    );
    assert_eq!(upload.body.matches("name=\"files\"").count(), 2);
    assert!(upload.body.contains("filename=\"one.jpg\""));
    assert!(upload.body.contains("filename=\"two.png\""));
    assert!(upload.body.contains("name=\"folder_id\""));
}

#[tokio::test]
async fn test_missing_token_sends_nothing() {
    let backend = StubBackend::start().await;
    let client = HttpGalleryClient::new(&backend.api_config(), Session::anonymous())
        .expect("client");

    let err = client.list_folders(&Scope::Root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(err.is_unauthenticated());
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let config = gallery_core::config::api::ApiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        auth_prefix: "/api".to_string(),
        request_timeout_seconds: Some(2),
    };
    let session = Session::authenticated(helpers::jwt_with_exp(4_102_444_800), "tester");
    let client = HttpGalleryClient::new(&config, session).expect("client");

    let err = client.list_images(&Scope::Root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}
