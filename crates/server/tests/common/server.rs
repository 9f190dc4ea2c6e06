//! Server test utilities.

use aviary_core::config::AppConfig;
use aviary_server::{AppState, create_router};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a test server with temporary storage and an upstream URL that
    /// nothing listens on.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a test server whose upstream client targets `base_url`
    /// (a stub provider spawned by the test).
    pub fn with_upstream(base_url: &str) -> Self {
        Self::build(Some(base_url))
    }

    fn build(upstream_base_url: Option<&str>) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp directory");

        let mut config = AppConfig::for_testing(temp_dir.path());
        if let Some(url) = upstream_base_url {
            config.upstream.base_url = url.to_string();
        }

        let state = AppState::new(config).expect("failed to build app state");
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }
}

/// Drive the router with one JSON request and decode the JSON response.
#[allow(dead_code)]
pub async fn json_request(
    router: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    let body = match body {
        Some(v) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&v).unwrap())
        }
        None => Body::empty(),
    };

    let request = builder.body(body).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, json)
}
