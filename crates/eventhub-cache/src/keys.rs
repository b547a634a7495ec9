//! Cache key builders.
//!
//! Keys are relative; [`RedisClient::prefixed_key`](crate::RedisClient::prefixed_key)
//! prepends the configured prefix.

/// Key marking a revoked token, addressed by its fingerprint.
pub fn revoked_token(token_hash: &str) -> String {
    format!("revoked:{token_hash}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revoked_token_key() {
        assert_eq!(revoked_token("abc123"), "revoked:abc123");
    }
}
