//! Redis connection and revocation store.

pub mod client;
pub mod revocation;

pub use client::RedisClient;
pub use revocation::RedisRevocationStore;
