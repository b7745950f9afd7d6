//! Shared types for the jastip order core
//!
//! Data model and error taxonomy used by both the lifecycle engine and
//! any embedding frontend: orders, messages, trips, role derivation.

pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{CoreError, CoreResult};
pub use models::{FeeSchedule, Message, NewOrder, NewTrip, Order, OrderStatus, Role, Trip};
