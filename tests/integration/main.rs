//! HTTP-level tests over in-memory stores.

mod auth_test;
mod events_test;
mod helpers;
