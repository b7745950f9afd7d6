//! Order lifecycle
//!
//! The full set of legal status moves lives in one edge table consulted
//! by a single transition entry point. Authorization is part of the edge:
//! each `(from, to)` pair names the role that may trigger it, so the
//! buyer-side and traveler-side surfaces cannot diverge in what they
//! permit.

pub mod machine;
pub mod transitions;

// Re-exports
pub use machine::OrderStateMachine;
pub use transitions::required_role;
