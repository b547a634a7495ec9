//! # eventhub-auth
//!
//! Authentication for EventHub.
//!
//! ## Modules
//!
//! - `jwt` issues and verifies the signed credential tokens
//! - `password` hashes and verifies passwords with Argon2id
//! - `session` resolves a token into a [`Session`], consulting the
//!   revocation list, and purges stale revocation records

pub mod error;
pub mod jwt;
pub mod password;
pub mod session;

pub use error::AuthError;
pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::PasswordHasher;
pub use session::{AuthPolicy, Authentication, RevocationSweeper, Session, SessionAuthenticator};
