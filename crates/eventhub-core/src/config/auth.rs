//! Authentication configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Credential token and cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256). Has no default; set it in
    /// a config file or through `EVENTHUB__AUTH__JWT_SECRET`.
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in minutes, counted from issuance.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Name of the cookie carrying the credential token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the credential cookie is marked `Secure`.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Reject tokens whose subject no longer exists instead of attaching
    /// an empty identity.
    #[serde(default)]
    pub reject_orphaned_tokens: bool,
    /// Seconds between purges of expired revocation records (0 disables).
    #[serde(default = "default_sweep_interval")]
    pub revocation_sweep_interval_seconds: u64,
}

impl AuthConfig {
    /// Token lifetime as a `std::time::Duration`.
    pub fn token_ttl(&self) -> Result<std::time::Duration, AppError> {
        match self.token_ttl_minutes.checked_mul(60) {
            Some(0) | None => Err(AppError::configuration(format!(
                "auth.token_ttl_minutes must be between 1 and {}, got {}",
                u64::MAX / 60,
                self.token_ttl_minutes
            ))),
            Some(secs) => Ok(std::time::Duration::from_secs(secs)),
        }
    }

    /// Reject settings that cannot produce a working authenticator.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration(
                "auth.jwt_secret is not set (use EVENTHUB__AUTH__JWT_SECRET)",
            ));
        }
        self.token_ttl().map(|_| ())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: default_token_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            reject_orphaned_tokens: false,
            revocation_sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_token_ttl() -> u64 {
    60
}

fn default_cookie_name() -> String {
    "x-auth-token".to_string()
}

fn default_sweep_interval() -> u64 {
    600
}
