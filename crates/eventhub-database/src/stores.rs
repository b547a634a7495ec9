//! Store traits consumed by the auth and service layers.
//!
//! Every backend (PostgreSQL repositories, in-memory maps, Redis for
//! revocations) implements these traits so callers only ever hold
//! `Arc<dyn ...>` handles.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use eventhub_core::result::AppResult;
use eventhub_entity::event::{CreateEvent, Event, UpdateEvent};
use eventhub_entity::user::{CreateUser, User};

use crate::memory::{MemoryEventStore, MemoryIdentityStore, MemoryRevocationStore};
use crate::repositories::{EventRepository, RevocationRepository, UserRepository};

/// Persistent user records.
#[async_trait]
pub trait IdentityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by (normalized) username.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// List every user, oldest first.
    async fn find_all(&self) -> AppResult<Vec<User>>;

    /// Insert a user. Fails with `Conflict` when the username is taken.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Delete a user. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

/// Persistent events and their likes.
#[async_trait]
pub trait EventStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find an event by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Event>>;

    /// List events. With a limit, the result is ordered by name and
    /// truncated; without one, every event is returned oldest first.
    async fn find_all(&self, limit: Option<u32>) -> AppResult<Vec<Event>>;

    /// Events created by `admin_id`.
    async fn find_by_admin(&self, admin_id: Uuid) -> AppResult<Vec<Event>>;

    /// Events liked by `user_id`.
    async fn find_liked_by(&self, user_id: Uuid) -> AppResult<Vec<Event>>;

    /// Insert an event.
    async fn create(&self, data: &CreateEvent) -> AppResult<Event>;

    /// Apply a partial update. `None` when the event does not exist.
    async fn update(&self, id: Uuid, data: UpdateEvent) -> AppResult<Option<Event>>;

    /// Delete an event. Returns `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Record a like (idempotent). `None` when the event does not exist.
    async fn add_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>>;

    /// Remove a like (idempotent). `None` when the event does not exist.
    async fn remove_like(&self, id: Uuid, user_id: Uuid) -> AppResult<Option<Event>>;
}

/// Tokens invalidated before their natural expiry.
#[async_trait]
pub trait RevocationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether this exact token string has been revoked.
    async fn is_revoked(&self, token: &str) -> AppResult<bool>;

    /// Revoke a token. Repeating the call for the same token succeeds and
    /// leaves a single record whose retention is the later of the two.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> AppResult<()>;

    /// Drop records whose retention ended at or before `now`.
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// The three store handles, bundled for wiring.
#[derive(Debug, Clone)]
pub struct Stores {
    /// User records.
    pub identities: Arc<dyn IdentityStore>,
    /// Events and likes.
    pub events: Arc<dyn EventStore>,
    /// Revoked tokens.
    pub revocations: Arc<dyn RevocationStore>,
}

impl Stores {
    /// PostgreSQL-backed stores sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            identities: Arc::new(UserRepository::new(pool.clone())),
            events: Arc::new(EventRepository::new(pool.clone())),
            revocations: Arc::new(RevocationRepository::new(pool)),
        }
    }

    /// Empty process-local stores.
    pub fn memory() -> Self {
        Self {
            identities: Arc::new(MemoryIdentityStore::new()),
            events: Arc::new(MemoryEventStore::new()),
            revocations: Arc::new(MemoryRevocationStore::new()),
        }
    }

    /// Replace the revocation backend (e.g. with Redis).
    pub fn with_revocations(mut self, revocations: Arc<dyn RevocationStore>) -> Self {
        self.revocations = revocations;
        self
    }
}
