//! Order Model
//!
//! One buyer request attached to one traveler's trip, progressing through
//! the lifecycle governed by the transition table in `jastip-core`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default service fee, smallest currency unit (Rp 25.000)
pub const DEFAULT_JASTIP_FEE: i64 = 25_000;

/// Default platform fee, smallest currency unit (Rp 5.000)
pub const DEFAULT_PLATFORM_FEE: i64 = 5_000;

/// Order status enum
///
/// Wire format is the snake_case string stored by the backend
/// (`pending_payment`, `paid_escrow`, ...). Edges between statuses are
/// defined in one place, the lifecycle transition table; nothing else may
/// move an order between variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Initial: waiting for the traveler to accept or reject
    PendingPayment,
    /// Traveler accepted; waiting for the buyer's payment proof
    Accepted,
    /// Terminal: traveler declined the request
    Rejected,
    /// Buyer uploaded payment proof, held pending verification
    PaidEscrow,
    /// Traveler bought the item
    Purchased,
    /// Item handed to shipping / ready for pickup
    Shipped,
    /// Terminal: buyer confirmed receipt
    Completed,
}

impl OrderStatus {
    /// Terminal statuses have no outgoing edges.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Rejected | OrderStatus::Completed)
    }
}

/// Fee schedule applied at order creation
///
/// Flat fees for now; `total_amount` is always recomputed as
/// `item_price + jastip_fee + platform_fee` and never mutated on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeeSchedule {
    pub jastip_fee: i64,
    pub platform_fee: i64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            jastip_fee: DEFAULT_JASTIP_FEE,
            platform_fee: DEFAULT_PLATFORM_FEE,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub trip_id: String,
    pub buyer_id: String,
    pub traveler_id: String,
    pub item_name: String,
    /// Estimated item price, smallest currency unit
    pub item_price: i64,
    pub jastip_fee: i64,
    pub platform_fee: i64,
    /// item_price + jastip_fee + platform_fee
    pub total_amount: i64,
    pub status: OrderStatus,
    /// Set at most once per escrow cycle, only together with the move
    /// into PaidEscrow
    pub payment_proof_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create order payload
///
/// Built via [`NewOrder::new`] so the fee-sum invariant holds from the
/// start; the store persists it verbatim with status `pending_payment`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewOrder {
    pub trip_id: String,
    pub buyer_id: String,
    pub traveler_id: String,
    #[validate(length(min = 1, message = "item name is required"))]
    pub item_name: String,
    #[validate(range(min = 1, message = "item price must be positive"))]
    pub item_price: i64,
    pub jastip_fee: i64,
    pub platform_fee: i64,
    pub total_amount: i64,
}

impl NewOrder {
    pub fn new(
        trip_id: impl Into<String>,
        buyer_id: impl Into<String>,
        traveler_id: impl Into<String>,
        item_name: impl Into<String>,
        item_price: i64,
        fees: FeeSchedule,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            buyer_id: buyer_id.into(),
            traveler_id: traveler_id.into(),
            item_name: item_name.into(),
            item_price,
            jastip_fee: fees.jastip_fee,
            platform_fee: fees.platform_fee,
            total_amount: item_price + fees.jastip_fee + fees.platform_fee,
        }
    }
}
