//! Session extractors.
//!
//! The session middleware stores the resolved [`Session`] in the request
//! extensions; these extractors read it back in handlers.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Response;

use eventhub_auth::Session;
use eventhub_core::error::AppError;
use eventhub_entity::user::User;

use crate::error::unauthorized;

/// The authenticated session. Only valid behind `require_session`.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

impl CurrentSession {
    /// The identity behind the token.
    ///
    /// Fails with 401 when the user was deleted after the token was issued.
    pub fn user(&self) -> Result<&User, AppError> {
        self.0
            .user
            .as_ref()
            .ok_or_else(|| AppError::authentication("Session user no longer exists"))
    }
}

impl std::ops::Deref for CurrentSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentSession)
            .ok_or_else(unauthorized)
    }
}

/// The session if one was resolved. Used behind `optional_session`.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<Session>);

impl MaybeSession {
    /// ID of the attached user, if both a session and its user exist.
    pub fn user_id(&self) -> Option<uuid::Uuid> {
        self.0
            .as_ref()
            .and_then(|s| s.user.as_ref())
            .map(|u| u.id)
    }
}

impl<S> FromRequestParts<S> for MaybeSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(parts.extensions.get::<Session>().cloned()))
    }
}
