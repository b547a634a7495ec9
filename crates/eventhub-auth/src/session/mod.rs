//! Token-to-session resolution and revocation housekeeping.

pub mod authenticator;
pub mod sweeper;

pub use authenticator::{AuthPolicy, Authentication, Session, SessionAuthenticator};
pub use sweeper::RevocationSweeper;
