//! # eventhub-cache
//!
//! Redis plumbing for EventHub. The only thing kept in Redis is the
//! revocation list: each revoked token becomes a key whose TTL matches
//! the remaining lifetime of the record, so Redis expires entries on its
//! own and no sweeping is needed.

pub mod keys;
pub mod redis;

pub use redis::{RedisClient, RedisRevocationStore};
