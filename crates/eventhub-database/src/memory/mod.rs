//! Process-local stores backed by `DashMap`.
//!
//! Used for `store.backend = "memory"` deployments and throughout the test
//! suites. Nothing survives a restart.

pub mod event;
pub mod revocation;
pub mod user;

pub use event::MemoryEventStore;
pub use revocation::MemoryRevocationStore;
pub use user::MemoryIdentityStore;
