//! Data models
//!
//! Shared between the lifecycle engine and any embedding frontend.
//! All IDs are opaque `String`s assigned by the backing store; all
//! amounts are positive integers in the smallest currency unit (rupiah).

pub mod message;
pub mod order;
pub mod role;
pub mod trip;

// Re-exports
pub use message::*;
pub use order::*;
pub use role::*;
pub use trip::*;
