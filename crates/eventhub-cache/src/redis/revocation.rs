//! Revocation list stored as expiring Redis keys.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::debug;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_database::RevocationStore;
use eventhub_entity::revocation::token_fingerprint;

use super::client::RedisClient;
use crate::keys;

/// [`RevocationStore`] where each revoked token is an expiring key.
///
/// Re-revoking a token only ever extends the key's TTL (`EXPIRE ... GT`,
/// Redis 7 or later).
#[derive(Debug, Clone)]
pub struct RedisRevocationStore {
    client: RedisClient,
}

impl RedisRevocationStore {
    /// Wrap a connected client.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }

    fn key_for(&self, token: &str) -> String {
        self.client
            .prefixed_key(&keys::revoked_token(&token_fingerprint(token)))
    }
}

/// Seconds until `expires_at`, rounded up and never less than one.
pub(crate) fn ttl_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let millis = (expires_at - now).num_milliseconds().max(1) as u64;
    millis.div_ceil(1000)
}

/// Create the key if absent, then raise its TTL to `ttl` unless it already
/// lives longer. Runs as one `MULTI`/`EXEC` block.
pub(crate) fn revoke_pipeline(key: &str, ttl: u64, revoked_at: i64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(revoked_at)
        .arg("NX")
        .arg("EX")
        .arg(ttl)
        .ignore()
        .cmd("EXPIRE")
        .arg(key)
        .arg(ttl)
        .arg("GT")
        .ignore();
    pipe
}

#[async_trait]
impl RevocationStore for RedisRevocationStore {
    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let revoked: bool = conn
            .exists(self.key_for(token))
            .await
            .map_err(Self::map_err)?;
        Ok(revoked)
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let key = self.key_for(token);
        let now = Utc::now();
        let ttl = ttl_seconds(expires_at, now);
        let mut conn = self.client.conn_mut();
        revoke_pipeline(&key, ttl, now.timestamp())
            .query_async::<()>(&mut conn)
            .await
            .map_err(Self::map_err)?;
        debug!(ttl_seconds = ttl, "Token revoked in Redis");
        Ok(())
    }

    async fn purge_expired(&self, _now: DateTime<Utc>) -> AppResult<u64> {
        // Redis drops the keys itself once their TTL runs out.
        Ok(0)
    }
}
