//! Authentication failure classification.

use thiserror::Error;

use eventhub_core::error::AppError;

/// Why a credential token did not produce a session.
///
/// Every variant except [`AuthError::Store`] is an authentication failure
/// and maps to HTTP 401. `Store` wraps an infrastructure error from a
/// backing store and is propagated as-is.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was supplied.
    #[error("No credential token supplied")]
    MissingToken,
    /// The token is correctly signed but past its expiry.
    #[error("Token has expired")]
    TokenExpired,
    /// The token was explicitly revoked (logged out).
    #[error("Token has been revoked")]
    TokenRevoked,
    /// Bad signature, malformed token or missing claims.
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    /// The token subject no longer exists and orphaned tokens are rejected.
    #[error("Token subject does not exist")]
    IdentityNotFound,
    /// A backing store failed.
    #[error(transparent)]
    Store(AppError),
}

impl AuthError {
    /// Whether this is the caller's fault (401) rather than ours.
    pub fn is_authentication_failure(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Store(inner) => inner,
            other => AppError::authentication(other.to_string()),
        }
    }
}
