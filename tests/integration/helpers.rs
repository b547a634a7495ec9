//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use eventhub_api::AppState;
use eventhub_core::config::AppConfig;
use eventhub_database::Stores;

/// Cookie name used by every test app.
pub const COOKIE_NAME: &str = "x-auth-token";

/// Test application context
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Stores behind the app, for direct setup and inspection
    pub stores: Stores,
    /// Application config
    pub config: AppConfig,
}

/// A response with its body parsed as JSON when possible.
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// JSON body, or `Value::Null` for non-JSON bodies
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestResponse {
    /// Value of the credential cookie set by this response, if any.
    pub fn session_cookie(&self) -> Option<String> {
        let prefix = format!("{COOKIE_NAME}=");
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with(&prefix))
            .map(|v| {
                let pair = v.split(';').next().unwrap_or_default();
                pair[prefix.len()..].to_string()
            })
    }
}

/// Application config used by tests.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.auth.cookie_name = COOKIE_NAME.to_string();
    config
}

impl TestApp {
    /// Create a new test application over empty in-memory stores
    pub fn new() -> Self {
        Self::with_stores(test_config(), Stores::memory())
    }

    /// Create a test application over the given stores
    pub fn with_stores(config: AppConfig, stores: Stores) -> Self {
        let state = AppState::new(config.clone(), stores.clone()).expect("Invalid test config");
        let router = eventhub_api::build_app(state);
        Self {
            router,
            stores,
            config,
        }
    }

    /// Register a user and return the issued credential token
    pub async fn register(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "first_name": "Test",
            "last_name": "User",
            "username": username,
            "password": password,
        });
        let response = self
            .request("POST", "/api/users/register", Some(body), None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Register failed: {}",
            response.text
        );

        response
            .session_cookie()
            .expect("No credential cookie in register response")
    }

    /// Login and return the issued credential token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        let response = self
            .request("POST", "/api/users/login", Some(body), None)
            .await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {}",
            response.text
        );

        response
            .session_cookie()
            .expect("No credential cookie in login response")
    }

    /// Make an HTTP request to the test app, sending `token` as the credential cookie
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = token {
            req = req.header(COOKIE, format!("{COOKIE_NAME}={token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}
