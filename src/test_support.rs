//! In-process HTTP backend used by tests that exercise live dispatch.

use axum::{
    Json, Router,
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;

use crate::core::config::Config;
use crate::domains::tools::ToolContext;

/// Token issued by the fake login endpoint.
pub const ISSUED_TOKEN: &str = "header.payload.signature";

/// Password accepted by the fake login endpoint.
pub const GOOD_PASSWORD: &str = "secret";

/// A one-operation spec used across tool tests.
pub const WIDGETS_SPEC: &str = r#"
openapi: 3.0.3
info:
  title: Widget API
  version: "1.0"
servers:
  - url: https://widgets.example.com
security:
  - bearerAuth: []
paths:
  /widgets:
    get:
      operationId: listWidgets
      summary: List widgets
      tags: [widgets]
      parameters:
        - name: limit
          in: query
          schema: { type: integer }
      responses:
        "200":
          description: The widgets
          content:
            application/json:
              schema: { type: array, items: { type: object } }
              example: [{ id: 1, name: sprocket }]
    options:
      summary: Not a recognized method
"#;

/// Write `content` to a temporary spec file.
pub fn spec_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(content.as_bytes()).expect("write spec");
    file
}

/// A tool context pointed at `base_url` with [`WIDGETS_SPEC`] loaded. Keep
/// the returned file alive while the context may reload it.
pub async fn widgets_context(base_url: &str) -> (ToolContext, NamedTempFile) {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();

    let ctx = ToolContext::new(Arc::new(config), reqwest::Client::new()).expect("context");
    let file = spec_file(WIDGETS_SPEC);
    let source = file.path().display().to_string();
    ctx.specs.load(&source).await.expect("load spec");
    ctx.session.record_spec_source(&source);

    (ctx, file)
}

/// Start the backend on an ephemeral port and return its base URL.
pub async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/text", get(|| async { "plain text body" }))
        .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
        .route("/missing", get(missing))
        .route("/slow", get(slow))
        .route("/spec.yaml", get(|| async { WIDGETS_SPEC }))
        .route("/broken-spec.yaml", get(broken_spec))
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{addr}")
}

/// A base URL where nothing listens.
pub fn unreachable_base() -> String {
    "http://127.0.0.1:1".to_string()
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let body = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()))
    };

    Json(json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query().unwrap_or(""),
        "authorization": header("authorization"),
        "x_trace": header("x-trace"),
        "content_type": header("content-type"),
        "body": body,
    }))
}

async fn login(Json(credentials): Json<Value>) -> impl IntoResponse {
    if credentials["password"] == GOOD_PASSWORD {
        (
            StatusCode::OK,
            Json(json!({
                "data": {
                    "token": ISSUED_TOKEN,
                    "user": { "email": credentials["email"] }
                }
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid credentials" })),
        )
    }
}

async fn missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not here" })))
}

async fn broken_spec() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "spec generator crashed")
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "finally"
}
