//! # eventhub-database
//!
//! Store abstractions for users, events and revoked tokens, with a
//! PostgreSQL implementation (sqlx) and a process-local one (dashmap).

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod stores;

pub use connection::DatabasePool;
pub use stores::{EventStore, IdentityStore, RevocationStore, Stores};
