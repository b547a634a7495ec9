//! # eventhub-service
//!
//! Business logic service layer for EventHub. Services receive their
//! stores and the session authenticator at construction time as `Arc`
//! handles and expose one method per use case.

pub mod event;
pub mod user;

pub use event::{EventService, EventView, NewEvent};
pub use user::{AuthenticatedUser, RegisterUser, UserProfile, UserService};
