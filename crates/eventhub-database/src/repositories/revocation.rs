//! Revoked token repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use eventhub_core::error::{AppError, ErrorKind};
use eventhub_core::result::AppResult;
use eventhub_entity::revocation::{RevokedToken, token_fingerprint};

use crate::stores::RevocationStore;

/// PostgreSQL-backed [`RevocationStore`] over the `revoked_tokens` table.
#[derive(Debug, Clone)]
pub struct RevocationRepository {
    pool: PgPool,
}

impl RevocationRepository {
    /// Create a new revocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevocationStore for RevocationRepository {
    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM revoked_tokens WHERE token_hash = $1)")
            .bind(token_fingerprint(token))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check token revocation", e)
            })
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let record = RevokedToken::new(token, Utc::now(), expires_at);
        sqlx::query(
            r#"INSERT INTO revoked_tokens (token_hash, revoked_at, expires_at)
               VALUES ($1, $2, $3)
               ON CONFLICT (token_hash)
               DO UPDATE SET expires_at = GREATEST(revoked_tokens.expires_at, EXCLUDED.expires_at)"#,
        )
        .bind(&record.token_hash)
        .bind(record.revoked_at)
        .bind(record.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke token", e))?;

        debug!(expires_at = %record.expires_at, "Token revoked");
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge revoked tokens", e)
            })?;
        Ok(result.rows_affected())
    }
}
