//! Shared test helpers for integration tests.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use gallery_browser::BrowserModel;
use gallery_client::session::{BearerToken, Session};
use gallery_client::{GalleryApi, HttpGalleryClient};
use gallery_core::config::api::ApiConfig;
use gallery_core::config::browser::{BreadcrumbStrategy, BrowserConfig};

/// Browser model over any backend.
pub fn browser<A: GalleryApi>(api: A, breadcrumb: BreadcrumbStrategy) -> BrowserModel {
    BrowserModel::new(Arc::new(api), BrowserConfig { breadcrumb })
}

/// An unsigned JWT carrying only an `exp` claim.
pub fn jwt_with_exp(exp: i64) -> BearerToken {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"user_id":7,"exp":{exp}}}"#));
    BearerToken::new(format!("{header}.{payload}.c2lnbmF0dXJl"))
}

/// A request as the stub backend received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Path plus query string
    pub target: String,
    /// Header pairs, names lowercased
    pub headers: Vec<(String, String)>,
    /// Raw body (lossy UTF-8)
    pub body: String,
}

impl RecordedRequest {
    /// Value of a header, by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path without the query string.
    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or_default()
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("JSON body")
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: StatusCode,
    body: String,
}

/// Axum backend on a loopback port.
///
/// Every request is recorded. Responses come from routes matched on method
/// and path (query ignored); anything else gets `200 []`.
#[derive(Debug, Clone)]
pub struct StubBackend {
    /// `http://127.0.0.1:{port}`
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    routes: Arc<Mutex<Vec<Route>>>,
}

impl StubBackend {
    /// Bind a random port and start serving.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub backend");
        let addr = listener.local_addr().expect("local addr");

        let backend = Self {
            base_url: format!("http://{addr}"),
            requests: Arc::new(Mutex::new(Vec::new())),
            routes: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new().fallback(record).with_state(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub backend stopped");
        });

        backend
    }

    /// Answer `method path` with `status` and a JSON body.
    pub async fn route(&self, method: &str, path: &str, status: u16, body: Value) {
        self.routes.lock().await.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status: StatusCode::from_u16(status).expect("valid status"),
            body: body.to_string(),
        });
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().await.clone()
    }

    /// API settings pointing at this backend.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            auth_prefix: "/api".to_string(),
            request_timeout_seconds: Some(5),
        }
    }

    /// A client authenticated with a long-lived token.
    pub fn client(&self) -> HttpGalleryClient {
        let session = Session::authenticated(jwt_with_exp(4_102_444_800), "tester");
        HttpGalleryClient::new(&self.api_config(), session).expect("client")
    }
}

/// Fallback handler: record the request, then answer from the route table.
async fn record(
    State(backend): State<StubBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.to_string(),
        target: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).to_string(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(&body).to_string(),
    };

    let (status, body) = {
        let routes = backend.routes.lock().await;
        routes
            .iter()
            .find(|r| r.method == request.method && r.path == request.path())
            .map_or((StatusCode::OK, "[]".to_string()), |r| {
                (r.status, r.body.clone())
            })
    };
    backend.requests.lock().await.push(request);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
