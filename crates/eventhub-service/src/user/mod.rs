//! Account and session use cases.

pub mod service;

pub use service::{AuthenticatedUser, RegisterUser, UserProfile, UserService};
