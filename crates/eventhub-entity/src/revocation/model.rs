//! Revocation record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;

/// A token invalidated by logout before its natural expiry.
///
/// Only the SHA-256 fingerprint of the token is kept so the revocation
/// list never holds usable credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RevokedToken {
    /// Hex SHA-256 of the raw token string.
    pub token_hash: String,
    /// When the token was revoked.
    pub revoked_at: DateTime<Utc>,
    /// After this instant the token can no longer verify, so the record
    /// may be purged.
    pub expires_at: DateTime<Utc>,
}

impl RevokedToken {
    /// Build a record for `token` revoked at `revoked_at`.
    pub fn new(token: &str, revoked_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            token_hash: token_fingerprint(token),
            revoked_at,
            expires_at,
        }
    }

    /// Whether the record is past its retention window at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Hex-encoded SHA-256 of a raw token.
pub fn token_fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
