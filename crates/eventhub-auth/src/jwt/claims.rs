//! JWT claims carried by every credential token.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims payload of a credential token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: Uuid,
    /// Token ID. Keeps tokens issued within the same second distinct.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}
