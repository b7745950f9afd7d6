//! Store contracts
//!
//! Abstract contracts the core requires from the backing data store and
//! blob storage. Persistence internals are out of scope; the one bundled
//! implementation is the in-memory [`MemoryStore`] used by tests and
//! embedded callers.

pub mod memory;

// Re-exports
pub use memory::MemoryStore;

use async_trait::async_trait;
use shared::{CoreError, Message, NewOrder, NewTrip, Order, OrderStatus, Trip};
use thiserror::Error;
use tokio::sync::broadcast;

/// Store error types
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conditional update precondition failed: the record's status no
    /// longer matches what the caller expected.
    #[error("Conflict: status is {actual:?}")]
    Conflict { actual: OrderStatus },

    #[error("Denied: {0}")]
    Denied(String),

    #[error("Invalid: {0}")]
    Invalid(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => CoreError::NotFound(what),
            // Callers that issue conditional updates intercept Conflict
            // before it reaches this blanket mapping.
            StoreError::Conflict { actual } => {
                CoreError::Store(format!("conflicting update, status is {actual:?}"))
            }
            StoreError::Denied(msg) => CoreError::Unauthorized(msg),
            StoreError::Invalid(msg) => CoreError::Validation(msg),
            StoreError::Backend(msg) => CoreError::Store(msg),
        }
    }
}

/// Durable record storage for orders, messages, and trips
///
/// The order `status` field has single-writer-per-transition semantics
/// here: [`OrderStore::update_order_status`] must reject a transition
/// whose precondition no longer holds. The core implements no locking of
/// its own on top of this.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order with status `pending_payment`.
    async fn insert_order(&self, order: NewOrder) -> StoreResult<Order>;

    async fn get_order(&self, order_id: &str) -> StoreResult<Order>;

    /// All orders where the user is buyer or traveler, newest first.
    async fn orders_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>>;

    /// Conditionally move an order to `new` iff its status is still
    /// `expected`, optionally setting `payment_proof_url` in the same
    /// update. Returns [`StoreError::Conflict`] when the precondition
    /// fails.
    async fn update_order_status(
        &self,
        order_id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        proof_url: Option<String>,
    ) -> StoreResult<Order>;

    /// Append a message. The store enforces that `sender_id` is one of
    /// the order's two parties and that `content` is non-empty.
    async fn insert_message(
        &self,
        order_id: &str,
        sender_id: &str,
        content: &str,
    ) -> StoreResult<Message>;

    /// Message history for one order, ascending by `created_at`.
    async fn messages(&self, order_id: &str) -> StoreResult<Vec<Message>>;

    /// Push feed of newly inserted messages scoped to one order. The feed
    /// may redeliver; consumers deduplicate by message id. Dropping the
    /// receiver releases the subscription.
    fn subscribe_messages(&self, order_id: &str) -> broadcast::Receiver<Message>;

    /// Interface-only pass-through for the out-of-scope trip posting flow.
    async fn insert_trip(&self, trip: NewTrip) -> StoreResult<Trip>;

    /// Interface-only pass-through for the out-of-scope trip browsing
    /// flow, newest first.
    async fn trips(&self) -> StoreResult<Vec<Trip>>;
}

/// Content storage for uploaded proof images
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> StoreResult<()>;

    /// Stable retrievable URL for a stored blob.
    fn public_url(&self, bucket: &str, key: &str) -> String;
}
