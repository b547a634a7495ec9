//! Backing store selection.

use serde::{Deserialize, Serialize};

/// Which implementation backs the identity, event and revocation stores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend for users and events.
    #[serde(default)]
    pub backend: StoreBackend,
    /// Backend for revoked tokens.
    #[serde(default)]
    pub revocation_backend: RevocationBackend,
    /// Redis settings, used when `revocation_backend = "redis"`.
    #[serde(default)]
    pub redis: RedisConfig,
}

/// Storage for users and events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL through sqlx.
    #[default]
    Postgres,
    /// Process-local maps; data is lost on restart.
    Memory,
}

/// Storage for revocation records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevocationBackend {
    /// Same backend as users and events.
    #[default]
    Database,
    /// Redis keys with a TTL equal to the token lifetime.
    Redis,
}

/// Redis connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all EventHub keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_key_prefix() -> String {
    "eventhub:".to_string()
}
