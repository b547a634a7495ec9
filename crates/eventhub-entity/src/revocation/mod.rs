//! Revoked credential tokens.

pub mod model;

pub use model::{RevokedToken, token_fingerprint};
