//! Message Model
//!
//! One chat entry scoped to exactly one order. Messages are immutable
//! once created and visible only to the two parties of their order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat message entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub order_id: String,
    /// Must be either the order's buyer or traveler
    pub sender_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Canonical ordering key: ascending `created_at`, ties broken by `id`.
    ///
    /// The transport may deliver out of order; every merged view sorts by
    /// this key and nothing stronger is guaranteed.
    pub fn sort_key(&self) -> (DateTime<Utc>, &str) {
        (self.created_at, self.id.as_str())
    }
}
