//! In-memory revocation store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use eventhub_core::result::AppResult;
use eventhub_entity::revocation::{RevokedToken, token_fingerprint};

use crate::stores::RevocationStore;

/// [`RevocationStore`] keyed by token fingerprint.
#[derive(Debug, Default)]
pub struct MemoryRevocationStore {
    records: DashMap<String, RevokedToken>,
}

impl MemoryRevocationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no token is revoked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RevocationStore for MemoryRevocationStore {
    async fn is_revoked(&self, token: &str) -> AppResult<bool> {
        Ok(self.records.contains_key(&token_fingerprint(token)))
    }

    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()> {
        let record = RevokedToken::new(token, Utc::now(), expires_at);
        self.records
            .entry(record.token_hash.clone())
            .and_modify(|existing| existing.expires_at = existing.expires_at.max(expires_at))
            .or_insert(record);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired(now));
        Ok(before.saturating_sub(self.records.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn test_revoke_twice_keeps_one_record() {
        let store = MemoryRevocationStore::new();
        let exp = Utc::now() + Duration::hours(1);

        store.revoke("token-a", exp).await.unwrap();
        store.revoke("token-a", exp).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.is_revoked("token-a").await.unwrap());
        assert!(!store.is_revoked("token-b").await.unwrap());
    }

    #[tokio::test]
    async fn test_repeat_revoke_extends_retention() {
        let store = MemoryRevocationStore::new();
        let now = Utc::now();

        store.revoke("t", now + Duration::minutes(5)).await.unwrap();
        store.revoke("t", now + Duration::minutes(50)).await.unwrap();

        assert_eq!(store.purge_expired(now + Duration::minutes(10)).await.unwrap(), 0);
        assert!(store.is_revoked("t").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_only_drops_expired() {
        let store = MemoryRevocationStore::new();
        let now = Utc::now();
        store.revoke("old", now - Duration::seconds(1)).await.unwrap();
        store.revoke("fresh", now + Duration::hours(1)).await.unwrap();

        assert_eq!(store.purge_expired(now).await.unwrap(), 1);
        assert!(!store.is_revoked("old").await.unwrap());
        assert!(store.is_revoked("fresh").await.unwrap());
    }
}
