//! Custom Axum extractors.

pub mod path;
pub mod session;

pub use path::parse_uuid;
pub use session::{CurrentSession, MaybeSession};
