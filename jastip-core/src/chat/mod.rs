//! Per-order chat
//!
//! One append-only discussion thread per order, shared by its buyer and
//! traveler. Runs alongside the lifecycle, keyed by the same order id,
//! independent of status.

pub mod channel;

// Re-exports
pub use channel::{ChatChannel, ChatEvent};
