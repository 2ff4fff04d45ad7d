//! Shared types for the tour-leader platform
//!
//! Common types used by the server and its in-process clients: data models,
//! message bus types and id/time helpers.

pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{BusMessage, EventType};
