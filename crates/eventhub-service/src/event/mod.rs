//! Event and like use cases.

pub mod service;

pub use service::{EventService, EventView, NewEvent};
