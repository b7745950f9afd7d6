//! Jastip Order Core
//!
//! Matches travelers with buyers who want items bought and carried for
//! them. Buyers attach orders to a traveler's trip; the two parties walk
//! the order through acceptance, escrow payment proof, purchase, shipment
//! and completion, coordinating in a per-order chat.
//!
//! # Architecture
//!
//! ```text
//! create order (external) ──▶ OrderStore::insert_order
//!
//! OrderStateMachine ──▶ OrderStore::update_order_status (conditional)
//!        ▲
//!        │ accepted -> paid_escrow, with proof URL
//! PaymentProofWorkflow ──▶ BlobStore::put
//!
//! ChatChannel ◀── OrderStore::subscribe_messages (per-order feed)
//!             ──▶ OrderStore::insert_message
//! ```
//!
//! The store is the single writer for order status: every transition is a
//! conditional update (`status == expected`), which is the only defense
//! against two parties racing conflicting transitions. Chat runs in
//! parallel, keyed by the same order id, independent of status.

pub mod chat;
pub mod config;
pub mod lifecycle;
pub mod proof;
pub mod store;

// Re-exports
pub use chat::{ChatChannel, ChatEvent};
pub use config::Config;
pub use lifecycle::OrderStateMachine;
pub use proof::{PaymentProofWorkflow, ProofUpload};
pub use store::{BlobStore, MemoryStore, OrderStore, StoreError, StoreResult};

// Re-export shared types for convenience
pub use shared::{CoreError, CoreResult, FeeSchedule, Message, Order, OrderStatus, Role};
