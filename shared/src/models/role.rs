//! Role derivation
//!
//! Role is derived, never stored: a pure function of `(order, viewer)`.
//! Both the state machine and the chat authorization check go through
//! [`Role::of`] so the two cannot disagree.

use crate::models::Order;
use serde::{Deserialize, Serialize};

/// Viewer's role with respect to one order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Posted the trip; fulfills purchase and delivery
    Traveler,
    /// Attached the order to the trip
    Buyer,
}

impl Role {
    /// Derive the viewer's role for `order`. `None` means the viewer is
    /// neither party and is not authorized for anything on this order.
    pub fn of(order: &Order, viewer_id: &str) -> Option<Role> {
        if viewer_id == order.traveler_id {
            Some(Role::Traveler)
        } else if viewer_id == order.buyer_id {
            Some(Role::Buyer)
        } else {
            None
        }
    }
}
