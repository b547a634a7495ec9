//! Integration tests for the cookie session flow.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use eventhub_auth::JwtEncoder;
use eventhub_core::error::AppError;
use eventhub_core::result::AppResult;
use eventhub_database::{RevocationStore, Stores};

use crate::helpers::{self, TestApp};

const UNAUTHORIZED: &str = "UNAUTHORIZED!";

#[derive(Debug)]
struct UnreachableRevocations;

#[async_trait]
impl RevocationStore for UnreachableRevocations {
    async fn is_revoked(&self, _token: &str) -> AppResult<bool> {
        Err(AppError::cache("revocation store unreachable"))
    }

    async fn revoke(&self, _token: &str, _expires_at: DateTime<Utc>) -> AppResult<()> {
        Err(AppError::cache("revocation store unreachable"))
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_register_sets_cookie_and_returns_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "username": "Grace",
                "password": "cobol59",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.session_cookie().is_some_and(|t| !t.is_empty()));
    assert_eq!(response.body["data"]["username"], "grace");
    assert!(response.body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new();
    app.register("grace", "cobol59").await;

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "first_name": "Other",
                "last_name": "Grace",
                "username": "GRACE",
                "password": "another1",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/users/register",
            Some(serde_json::json!({
                "first_name": "Grace",
                "last_name": "Hopper",
                "username": "grace",
                "password": "123",
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.register("grace", "cobol59").await;

    let token = app.login("Grace", "cobol59").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register("grace", "cobol59").await;

    let wrong_password = app
        .request(
            "POST",
            "/api/users/login",
            Some(serde_json::json!({ "username": "grace", "password": "fortran" })),
            None,
        )
        .await;
    let unknown_user = app
        .request(
            "POST",
            "/api/users/login",
            Some(serde_json::json!({ "username": "nobody", "password": "cobol59" })),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.text, unknown_user.text);
    assert!(wrong_password.session_cookie().is_none());
}

#[tokio::test]
async fn test_me_authenticated() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["username"], "grace");
    assert!(response.body["data"]["liked_events"].is_array());
    assert!(response.body["data"]["created_events"].is_array());
}

#[tokio::test]
async fn test_me_without_cookie() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/users/me", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_tampered_token() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;

    let response = app
        .request("GET", "/api/users/me", None, Some(&format!("{token}x")))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_expired_token() {
    let app = TestApp::new();
    app.register("grace", "cobol59").await;
    let user = app
        .stores
        .identities
        .find_by_username("grace")
        .await
        .unwrap()
        .unwrap();

    let expired = JwtEncoder::new(&app.config.auth)
        .unwrap()
        .issue_at(user.id, Utc::now() - Duration::hours(2))
        .unwrap();

    let response = app
        .request("GET", "/api/users/me", None, Some(&expired.token))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;

    let response = app
        .request("POST", "/api/users/logout", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.text, "Logout successfully!");
    assert_eq!(response.session_cookie().as_deref(), Some(""));

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_leaves_other_sessions_alone() {
    let app = TestApp::new();
    let first = app.register("grace", "cobol59").await;
    let second = app.login("grace", "cobol59").await;
    assert_ne!(first, second);

    app.request("POST", "/api/users/logout", None, Some(&first))
        .await;

    let response = app.request("GET", "/api/users/me", None, Some(&second)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_is_repeatable() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;

    for _ in 0..2 {
        let response = app
            .request("POST", "/api/users/logout", None, Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let response = app.request("POST", "/api/users/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_optional_route_ignores_bad_cookie() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;
    app.request("POST", "/api/users/logout", None, Some(&token))
        .await;

    for cookie in [None, Some("not-a-jwt"), Some(token.as_str())] {
        let response = app.request("GET", "/api/events", None, cookie).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["data"], serde_json::json!([]));
    }
}

#[tokio::test]
async fn test_unreachable_revocation_store_is_a_server_error() {
    let stores = Stores::memory().with_revocations(Arc::new(UnreachableRevocations));
    let app = TestApp::with_stores(helpers::test_config(), stores);
    let token = app.register("grace", "cobol59").await;

    let me = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::INTERNAL_SERVER_ERROR);

    let events = app.request("GET", "/api/events", None, Some(&token)).await;
    assert_eq!(events.status, StatusCode::INTERNAL_SERVER_ERROR);

    let anonymous = app.request("GET", "/api/events", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);

    let logout = app
        .request("POST", "/api/users/logout", None, Some(&token))
        .await;
    assert_eq!(logout.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_token_of_deleted_user() {
    let app = TestApp::new();
    let token = app.register("grace", "cobol59").await;
    let user = app
        .stores
        .identities
        .find_by_username("grace")
        .await
        .unwrap()
        .unwrap();

    let response = app
        .request("DELETE", &format!("/api/users/{}", user.id), None, None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_ne!(response.text, UNAUTHORIZED);

    let response = app.request("GET", "/api/events", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_token_of_deleted_user_rejected_when_configured() {
    let mut config = helpers::test_config();
    config.auth.reject_orphaned_tokens = true;
    let app = TestApp::with_stores(config, Stores::memory());
    let token = app.register("grace", "cobol59").await;
    let user = app
        .stores
        .identities
        .find_by_username("grace")
        .await
        .unwrap()
        .unwrap();
    app.stores.identities.delete(user.id).await.unwrap();

    let response = app.request("GET", "/api/users/me", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.text, UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let app = TestApp::new();

    let response = app
        .request("DELETE", &format!("/api/users/{}", Uuid::new_v4()), None, None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("DELETE", "/api/users/not-a-uuid", None, None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
