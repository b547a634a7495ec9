//! JWT signature and expiry verification.

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use eventhub_core::config::AuthConfig;

use super::claims::Claims;
use crate::error::AuthError;

/// Seconds of clock skew tolerated past `exp`.
pub const LEEWAY_SECONDS: u64 = 5;

/// How long after `exp` a token can still pass [`JwtDecoder::verify`].
///
/// Expiry is compared in whole seconds, so a token verifies until one
/// second past `exp + leeway`.
pub fn verification_grace() -> Duration {
    Duration::seconds(LEEWAY_SECONDS as i64 + 1)
}

/// Verifies credential tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = LEEWAY_SECONDS;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Checks the signature and expiry of `token` and returns its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => AuthError::TokenExpired,
                JwtErrorKind::InvalidSignature => {
                    AuthError::InvalidToken("signature mismatch".to_string())
                }
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}
