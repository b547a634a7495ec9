//! User handlers: registration, login, logout, profile and account admin.

use axum::Json;
use axum::extract::{Path, State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use eventhub_core::config::AuthConfig;
use eventhub_core::error::AppError;
use eventhub_entity::user::User;
use eventhub_service::UserProfile;

use crate::dto::request::{LoginRequest, RegisterRequest, validated};
use crate::dto::response::{ApiResponse, MessageResponse};
use crate::extractors::{CurrentSession, parse_uuid};
use crate::state::AppState;

/// Body of a successful logout.
pub const LOGOUT_MESSAGE: &str = "Logout successfully!";

fn session_cookie(config: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.user_service.list().await?;
    Ok(Json(ApiResponse::ok(users)))
}

/// GET /api/users/me
pub async fn me(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<ApiResponse<UserProfile>>, AppError> {
    let profile = state.user_service.profile(session.user()?).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<ApiResponse<User>>), AppError> {
    let req = validated(req)?;
    let out = state.user_service.register(req.into()).await?;

    let jar = jar.add(session_cookie(&state.config.auth, out.token.token));
    Ok((jar, Json(ApiResponse::ok(out.user))))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<User>>), AppError> {
    let req = validated(req)?;
    let out = state.user_service.login(&req.username, &req.password).await?;

    let jar = jar.add(session_cookie(&state.config.auth, out.token.token));
    Ok((jar, Json(ApiResponse::ok(out.user))))
}

/// POST /api/users/logout
///
/// Revokes whatever token the cookie carries and clears the cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, &'static str), AppError> {
    let cookie_name = state.config.auth.cookie_name.clone();
    let token = jar
        .get(&cookie_name)
        .map(|c| c.value().to_string())
        .unwrap_or_default();

    state.user_service.logout(&token).await?;

    let jar = jar.remove(Cookie::build((cookie_name, "")).path("/"));
    Ok((jar, LOGOUT_MESSAGE))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<MessageResponse>>, AppError> {
    let id = parse_uuid(&id)?;
    if !state.user_service.delete(id).await? {
        return Err(AppError::not_found(format!("User {id} not found")));
    }

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: "User deleted".to_string(),
    })))
}
