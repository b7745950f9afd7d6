//! Transition table
//!
//! | From            | To          | Actor    |
//! |-----------------|-------------|----------|
//! | pending_payment | accepted    | Traveler |
//! | pending_payment | rejected    | Traveler |
//! | accepted        | paid_escrow | Buyer    |
//! | paid_escrow     | purchased   | Traveler |
//! | purchased       | shipped     | Traveler |
//! | shipped         | completed   | Buyer    |
//!
//! `rejected` and `completed` are terminal: no outgoing edges.

use shared::{OrderStatus, Role};

/// Role required to move an order along the `(from, to)` edge, or `None`
/// when no such edge exists.
pub fn required_role(from: OrderStatus, to: OrderStatus) -> Option<Role> {
    use OrderStatus::*;
    match (from, to) {
        (PendingPayment, Accepted) => Some(Role::Traveler),
        (PendingPayment, Rejected) => Some(Role::Traveler),
        (Accepted, PaidEscrow) => Some(Role::Buyer),
        (PaidEscrow, Purchased) => Some(Role::Traveler),
        (Purchased, Shipped) => Some(Role::Traveler),
        (Shipped, Completed) => Some(Role::Buyer),
        _ => None,
    }
}
