//! Optional login convenience.
//!
//! Assumes a backend exposing `POST /api/auth/login` that answers with
//! `{"data": {"token": ..., "user": ...}}`. Backends following another
//! convention should obtain a token themselves and use `set_bearer_token`.

use reqwest::Method;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use super::dispatcher::{DispatchRequest, RequestDispatcher};
use super::envelope::ToolResult;
use crate::domains::session::TokenUpdate;

/// Path of the login endpoint.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Result of a login attempt.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub success: bool,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_preview: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Raw login response, attached on failure for diagnostics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_response: Option<ToolResult>,
}

impl LoginOutcome {
    fn failed(message: impl Into<String>, error: impl Into<String>, response: ToolResult) -> Self {
        Self {
            success: false,
            message: message.into(),
            token_preview: None,
            user: None,
            error: Some(error.into()),
            login_response: Some(response),
        }
    }
}

impl RequestDispatcher {
    /// Log in and install the returned token as the session credential.
    /// Never fails; problems are reported in the outcome.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> LoginOutcome {
        let request = DispatchRequest::new(Method::POST, LOGIN_PATH)
            .with_json_body(json!({ "email": email, "password": password }))
            .without_credential();
        let response = self.dispatch(request).await;

        if !response.success {
            let error = response
                .error
                .clone()
                .unwrap_or_else(|| format!("Login endpoint returned status {}", response.status_code));
            warn!("Login failed: {}", error);
            return LoginOutcome::failed("Login failed", error, response);
        }

        let data = response.body.as_json().and_then(|body| body.get("data"));
        let token = data
            .and_then(|data| data.get("token"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let user = data.and_then(|data| data.get("user")).cloned();

        let Some(token) = token else {
            warn!("Login response did not contain data.token");
            return LoginOutcome::failed(
                "Login succeeded but no token was found",
                "Response body has no data.token field",
                response,
            );
        };

        match self.session.set_bearer_token(&token) {
            Ok(TokenUpdate::Set { preview }) => {
                info!("Logged in as {}", email);
                LoginOutcome {
                    success: true,
                    message: "Login successful, bearer token set".to_string(),
                    token_preview: Some(preview),
                    user,
                    error: None,
                    login_response: None,
                }
            }
            Ok(TokenUpdate::Cleared) => LoginOutcome::failed(
                "Login returned an empty token",
                "Token was empty",
                response,
            ),
            Err(e) => {
                warn!("Rejected token from login: {}", e);
                LoginOutcome::failed("Login returned an unusable token", e.to_string(), response)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domains::api::RequestDispatcher;
    use crate::domains::session::SessionState;
    use crate::test_support::{GOOD_PASSWORD, ISSUED_TOKEN, spawn_backend, unreachable_base};
    use std::sync::Arc;
    use std::time::Duration;

    fn dispatcher(base_url: &str) -> RequestDispatcher {
        let session = Arc::new(SessionState::new(base_url, None).unwrap());
        RequestDispatcher::new(reqwest::Client::new(), session, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_login_sets_token() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);

        let outcome = dispatcher.login("dev@example.com", GOOD_PASSWORD).await;
        assert!(outcome.success);
        assert_eq!(outcome.user.unwrap()["email"], "dev@example.com");
        assert!(outcome.login_response.is_none());
        assert_eq!(
            dispatcher.session.snapshot().bearer_token.as_deref(),
            Some(ISSUED_TOKEN)
        );
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_session() {
        let base = spawn_backend().await;
        let dispatcher = dispatcher(&base);

        let outcome = dispatcher.login("dev@example.com", "wrong").await;
        assert!(!outcome.success);
        assert_eq!(outcome.login_response.unwrap().status_code, 401);
        assert!(!dispatcher.session.token_status().has_token);
    }

    #[tokio::test]
    async fn test_login_unreachable_fails_softly() {
        let dispatcher = dispatcher(&unreachable_base());
        let outcome = dispatcher.login("dev@example.com", GOOD_PASSWORD).await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
