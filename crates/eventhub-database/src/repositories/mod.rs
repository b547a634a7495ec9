//! PostgreSQL implementations of the store traits.

pub mod event;
pub mod revocation;
pub mod user;

pub use event::EventRepository;
pub use revocation::RevocationRepository;
pub use user::UserRepository;
