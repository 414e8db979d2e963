//! Request dispatcher - executes live calls against the configured API.
//!
//! Every call takes one session snapshot when it starts, so a concurrent
//! `set_base_url` or `set_bearer_token` never affects a request in flight.
//! Failures are folded into the returned [`ToolResult`]; `dispatch` itself
//! cannot fail.

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::envelope::{ResponseBody, ToolResult};
use crate::domains::session::SessionState;

/// One outgoing call. The path is appended to the base URL verbatim; path
/// templates must already be expanded.
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub path: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    pub query: Vec<(String, String)>,
    pub json_body: Option<Value>,
    pub use_credential: bool,
    pub timeout: Option<Duration>,
}

impl DispatchRequest {
    /// A request with no headers, query or body that sends the session
    /// credential.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: BTreeMap::new(),
            query: Vec::new(),
            json_body: None,
            use_credential: true,
            timeout: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_json_body(mut self, body: Value) -> Self {
        self.json_body = Some(body);
        self
    }

    pub fn without_credential(mut self) -> Self {
        self.use_credential = false;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Executes HTTP calls using the shared client and session.
#[derive(Clone)]
pub struct RequestDispatcher {
    client: reqwest::Client,
    pub(super) session: Arc<SessionState>,
    default_timeout: Duration,
}

impl RequestDispatcher {
    pub fn new(client: reqwest::Client, session: Arc<SessionState>, default_timeout: Duration) -> Self {
        Self {
            client,
            session,
            default_timeout,
        }
    }

    /// Send `request` and normalize the outcome into a [`ToolResult`].
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn dispatch(&self, request: DispatchRequest) -> ToolResult {
        let session = self.session.snapshot();
        let started = Instant::now();
        let method = request.method.to_string();
        let raw_url = join_url(&session.base_url, &request.path);

        let url = match build_url(&raw_url, &request.query) {
            Ok(url) => url,
            Err(message) => {
                warn!("{}", message);
                return ToolResult::failure(method, raw_url, message, elapsed_ms(started));
            }
        };

        let token = session
            .bearer_token
            .as_deref()
            .filter(|_| request.use_credential);
        let headers = match build_headers(&request.headers, token) {
            Ok(headers) => headers,
            Err(message) => {
                warn!("{}", message);
                return ToolResult::failure(method, url, message, elapsed_ms(started));
            }
        };

        let timeout = request.timeout.unwrap_or(self.default_timeout);
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = &request.json_body {
            builder = builder.json(body);
        }

        debug!("Sending {} {}", method, url);
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e, timeout);
                warn!("{} {} failed: {}", method, url, message);
                return ToolResult::failure(method, url, message, elapsed_ms(started));
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        let response_headers = collect_headers(response.headers());

        let (body, error) = match response.bytes().await {
            Ok(bytes) => (ResponseBody::from_bytes(&bytes), None),
            Err(e) => (
                ResponseBody::Empty,
                Some(format!("Failed to read response body: {}", error_chain(&e))),
            ),
        };

        info!("{} {} -> {}", method, final_url, status.as_u16());

        ToolResult {
            status_code: status.as_u16(),
            headers: response_headers,
            body,
            url: final_url,
            method,
            success: status.is_success() && error.is_none(),
            error,
            elapsed_ms: elapsed_ms(started),
        }
    }
}

/// Base URL + path, inserting the separating slash when the path lacks it.
fn join_url(base_url: &str, path: &str) -> String {
    if path.is_empty() || path.starts_with('/') || path.starts_with('?') {
        format!("{base_url}{path}")
    } else {
        format!("{base_url}/{path}")
    }
}

fn build_url(raw: &str, query: &[(String, String)]) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| format!("Invalid request URL '{raw}': {e}"))?;
    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query {
            pairs.append_pair(name, value);
        }
    }
    Ok(url)
}

/// Caller headers plus the bearer credential, which overrides any
/// caller-supplied Authorization header.
fn build_headers(
    headers: &BTreeMap<String, String>,
    token: Option<&str>,
) -> Result<HeaderMap, String> {
    let mut map = HeaderMap::new();

    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| format!("Invalid header name '{name}': {e}"))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| format!("Invalid value for header '{name}': {e}"))?;
        map.insert(header_name, header_value);
    }

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| format!("Invalid bearer token header: {e}"))?;
        value.set_sensitive(true);
        map.insert(AUTHORIZATION, value);
    }

    Ok(map)
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

fn describe_transport_error(e: &reqwest::Error, timeout: Duration) -> String {
    if e.is_timeout() {
        format!("Request timed out after {:.1}s", timeout.as_secs_f64())
    } else if e.is_connect() {
        format!("Connection failed: {}", error_chain(e))
    } else if e.is_builder() {
        format!("Invalid request: {}", error_chain(e))
    } else {
        format!("Request failed: {}", error_chain(e))
    }
}

/// The error message followed by each underlying cause.
fn error_chain(e: &reqwest::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_backend, unreachable_base};
    use serde_json::json;

    fn dispatcher(base_url: &str) -> RequestDispatcher {
        let session = Arc::new(SessionState::new(base_url, None).unwrap());
        RequestDispatcher::new(reqwest::Client::new(), session, Duration::from_secs(5))
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h", "/a"), "http://h/a");
        assert_eq!(join_url("http://h", "a"), "http://h/a");
        assert_eq!(join_url("http://h", ""), "http://h");
    }

    #[test]
    fn test_build_headers_overrides_authorization() {
        let mut headers = BTreeMap::new();
        headers.insert("authorization".to_string(), "Basic abc".to_string());
        headers.insert("X-Trace".to_string(), "1".to_string());

        let map = build_headers(&headers, Some("a.b.c")).unwrap();
        assert_eq!(map.get(AUTHORIZATION).unwrap(), "Bearer a.b.c");
        assert_eq!(map.get("x-trace").unwrap(), "1");

        let map = build_headers(&headers, None).unwrap();
        assert_eq!(map.get(AUTHORIZATION).unwrap(), "Basic abc");

        headers.insert("bad header".to_string(), "x".to_string());
        assert!(build_headers(&headers, None).is_err());
    }

    #[tokio::test]
    async fn test_dispatch_json_round_trip() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);
        dispatcher.session.set_bearer_token("a.b.c").unwrap();

        let result = dispatcher
            .dispatch(
                DispatchRequest::new(Method::POST, "/things")
                    .with_header("Authorization", "Basic nope")
                    .with_query("tag", "red")
                    .with_query("tag", "blue")
                    .with_json_body(json!({ "name": "w" })),
            )
            .await;

        assert!(result.success);
        assert_eq!(result.status_code, 200);
        assert_eq!(result.method, "POST");
        assert!(result.url.ends_with("/things?tag=red&tag=blue"));

        let body = result.body.as_json().unwrap();
        assert_eq!(body["path"], "/things");
        assert_eq!(body["query"], "tag=red&tag=blue");
        assert_eq!(body["authorization"], "Bearer a.b.c");
        assert_eq!(body["body"], json!({ "name": "w" }));
        assert!(result.headers.contains_key("content-type"));
    }

    #[tokio::test]
    async fn test_dispatch_without_credential() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);
        dispatcher.session.set_bearer_token("a.b.c").unwrap();

        let result = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/x").without_credential())
            .await;
        assert_eq!(result.body.as_json().unwrap()["authorization"], Value::Null);
    }

    #[tokio::test]
    async fn test_dispatch_text_empty_and_error_statuses() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);

        let text = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/text"))
            .await;
        assert!(text.success);
        assert_eq!(text.body, ResponseBody::Text("plain text body".to_string()));

        let empty = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/empty"))
            .await;
        assert_eq!(empty.status_code, 204);
        assert_eq!(empty.body, ResponseBody::Empty);

        let missing = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/missing"))
            .await;
        assert!(!missing.success);
        assert_eq!(missing.status_code, 404);
        assert!(missing.error.is_none());
        assert_eq!(missing.body.as_json().unwrap()["error"], "not here");
    }

    #[tokio::test]
    async fn test_dispatch_unreachable_host() {
        let dispatcher = dispatcher(&unreachable_base());
        let result = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/anything"))
            .await;

        assert_eq!(result.status_code, 0);
        assert!(!result.success);
        assert!(!result.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_timeout() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);

        let result = dispatcher
            .dispatch(
                DispatchRequest::new(Method::GET, "/slow").with_timeout(Duration::from_millis(200)),
            )
            .await;
        assert_eq!(result.status_code, 0);
        assert!(result.error.unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_session_snapshot_taken_when_call_starts() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);

        let request = dispatcher.dispatch(DispatchRequest::new(Method::GET, "/first"));
        // Not polled yet, so the swap below is what the call sees.
        dispatcher.session.set_base_url(&unreachable_base()).unwrap();
        let result = request.await;
        assert_eq!(result.status_code, 0);

        dispatcher.session.set_base_url(&base).unwrap();
        let result = dispatcher
            .dispatch(DispatchRequest::new(Method::GET, "/second"))
            .await;
        assert!(result.success);
    }
}
