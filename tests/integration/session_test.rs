//! Login, session persistence, and unauthenticated behavior.

use serde_json::json;

use gallery_client::dto::Credentials;
use gallery_client::memory::MemoryGalleryApi;
use gallery_client::session::{FileSessionStore, Session, SessionStore};
use gallery_client::{AuthApi, GalleryApi, HttpGalleryClient};
use gallery_core::config::browser::BreadcrumbStrategy;
use gallery_core::error::ErrorKind;
use gallery_core::types::Scope;

use crate::helpers::{self, StubBackend};

#[tokio::test]
async fn test_register_login_persist_and_browse() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));

    let backend = MemoryGalleryApi::new();
    let anonymous = backend.with_session(Session::anonymous());
    anonymous
        .register(&Credentials::new("alice", "secret"))
        .await
        .expect("register");
    let token = anonymous
        .login(&Credentials::new("alice", "secret"))
        .await
        .expect("login");
    store
        .save(&Session::authenticated(token, "alice"))
        .await
        .expect("save");

    let restored = store.load().await.expect("load");
    assert_eq!(restored.username.as_deref(), Some("alice"));
    assert!(restored.is_authenticated());

    backend.seed_folder("Trip", None).await;
    let mut browser = helpers::browser(
        backend.with_session(restored),
        BreadcrumbStrategy::Resolve,
    );
    browser.navigate_to(Scope::Root).await.expect("browse");
    assert_eq!(browser.folders()[0].name, "Trip");
}

#[tokio::test]
async fn test_logout_leaves_browser_unauthenticated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileSessionStore::new(dir.path().join("session.json"));
    store
        .save(&Session::authenticated(
            helpers::jwt_with_exp(4_102_444_800),
            "alice",
        ))
        .await
        .expect("save");
    store.clear().await.expect("logout");

    let session = store.load().await.expect("load");
    assert!(!session.is_authenticated());

    let backend = MemoryGalleryApi::new();
    let mut browser = helpers::browser(backend.with_session(session), BreadcrumbStrategy::Walk);
    let err = browser.navigate_to(Scope::Root).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(backend.calls().await.is_empty());
    assert_eq!(browser.generation(), 1);
    assert!(browser.folders().is_empty());
}

#[tokio::test]
async fn test_expired_token_is_rejected_locally() {
    let backend = StubBackend::start().await;
    let session = Session::authenticated(helpers::jwt_with_exp(1_000_000_000), "alice");
    let client = HttpGalleryClient::new(&backend.api_config(), session).expect("client");

    let err = client.list_folders(&Scope::Root).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(err.message.contains("expired"));
    assert!(backend.requests().await.is_empty());
}

#[tokio::test]
async fn test_http_login_uses_auth_prefix() {
    let backend = StubBackend::start().await;
    let token = helpers::jwt_with_exp(4_102_444_800);
    backend
        .route(
            "POST",
            "/api/login",
            200,
            json!({"token": token.as_str(), "message": "Login successful"}),
        )
        .await;
    let client = HttpGalleryClient::new(&backend.api_config(), Session::anonymous())
        .expect("client");

    let issued = client
        .login(&Credentials::new("alice", "secret"))
        .await
        .expect("login");
    assert_eq!(issued, token);

    let requests = backend.requests().await;
    assert_eq!(requests[0].target, "/api/login");
    assert_eq!(
        requests[0].json(),
        json!({"username": "alice", "password": "secret"})
    );
    assert!(requests[0].header("authorization").is_none());

    let authed = client.with_session(Session::authenticated(issued, "alice"));
    authed.list_folders(&Scope::Root).await.expect("listing");
    assert!(
        backend.requests().await[1]
            .header("authorization")
            .is_some_and(|h| h == format!("Bearer {}", token.as_str()))
    );
}

#[tokio::test]
async fn test_login_rejection_is_authentication_error() {
    let backend = StubBackend::start().await;
    backend
        .route(
            "POST",
            "/api/login",
            401,
            json!({"message": "Invalid credentials"}),
        )
        .await;
    let client = HttpGalleryClient::new(&backend.api_config(), Session::anonymous())
        .expect("client");

    let err = client
        .login(&Credentials::new("alice", "wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "Invalid credentials");
}
