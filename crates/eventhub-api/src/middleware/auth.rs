//! Cookie session middleware.
//!
//! Reads the credential token from the configured cookie, asks the
//! [`SessionAuthenticator`](eventhub_auth::SessionAuthenticator) to resolve
//! it and, on success, inserts the [`Session`](eventhub_auth::Session) into
//! the request extensions for the extractors to pick up.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use eventhub_auth::{AuthPolicy, Authentication};

use crate::error::auth_error_response;
use crate::state::AppState;

/// Token carried by the credential cookie, or `""` when absent.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> String {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .unwrap_or_default()
}

/// Rejects the request with 401 unless the cookie resolves to a session.
pub async fn require_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    authenticate(&state, AuthPolicy::Required, request, next).await
}

/// Attaches a session when the cookie resolves to one; otherwise proceeds
/// anonymously. Store failures still fail the request.
pub async fn optional_session(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    authenticate(&state, AuthPolicy::Optional, request, next).await
}

async fn authenticate(
    state: &AppState,
    policy: AuthPolicy,
    mut request: Request,
    next: Next,
) -> Response {
    let token = session_token(request.headers(), &state.config.auth.cookie_name);

    match state.authenticator.authenticate(&token, policy).await {
        Ok(Authentication::Authenticated(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(Authentication::Anonymous) => next.run(request).await,
        Err(e) => auth_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header::COOKIE;
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; x-auth-token=abc.def.ghi"),
        );
        assert_eq!(session_token(&headers, "x-auth-token"), "abc.def.ghi");
        assert_eq!(session_token(&headers, "other"), "");
    }

    #[test]
    fn test_session_token_without_cookie_header() {
        assert_eq!(session_token(&HeaderMap::new(), "x-auth-token"), "");
    }
}
