//! OrderStateMachine - validates and applies role-gated status moves
//!
//! Every status change on an order flows through [`OrderStateMachine::transition`]:
//!
//! 1. Load the order and derive the actor's role (pure, from the record).
//! 2. Look up the `(current, requested)` edge; no edge is `InvalidTransition`.
//! 3. Wrong role for the edge is `Unauthorized`; the order is untouched.
//! 4. Commit via the store's conditional update. A concurrent transition
//!    surfaces as a store conflict and is reported as `InvalidTransition`
//!    against the status actually found; the caller refetches and retries.
//!
//! The machine never reads or writes `payment_proof_url` itself; the
//! proof workflow passes the URL through for its one edge.

use crate::lifecycle::transitions::required_role;
use crate::store::{OrderStore, StoreError};
use shared::{CoreError, CoreResult, Order, OrderStatus, Role};
use std::sync::Arc;

pub struct OrderStateMachine<S> {
    store: Arc<S>,
}

impl<S: OrderStore> OrderStateMachine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Move `order_id` to `to` on behalf of `actor_id`, returning the
    /// updated order.
    pub async fn transition(
        &self,
        order_id: &str,
        to: OrderStatus,
        actor_id: &str,
    ) -> CoreResult<Order> {
        self.apply(order_id, to, actor_id, None).await
    }

    /// Same as [`transition`](Self::transition), with an extra field
    /// carried into the store update. Only the proof workflow uses this,
    /// pairing `payment_proof_url` atomically with `accepted -> paid_escrow`.
    pub(crate) async fn apply(
        &self,
        order_id: &str,
        to: OrderStatus,
        actor_id: &str,
        proof_url: Option<String>,
    ) -> CoreResult<Order> {
        let order = self.store.get_order(order_id).await?;
        let from = order.status;

        let required = required_role(from, to)
            .ok_or(CoreError::InvalidTransition { from, to })?;

        let actor = Role::of(&order, actor_id).ok_or_else(|| {
            CoreError::Unauthorized(format!("{actor_id} is not a party of order {order_id}"))
        })?;
        if actor != required {
            tracing::warn!(
                order_id,
                actor_id,
                ?from,
                ?to,
                required = ?required,
                "Transition refused: role mismatch"
            );
            return Err(CoreError::Unauthorized(format!(
                "{from:?} -> {to:?} requires the {required:?} of this order"
            )));
        }

        let updated = self
            .store
            .update_order_status(order_id, from, to, proof_url)
            .await
            .map_err(|e| match e {
                // Lost a race: another transition landed after our read.
                StoreError::Conflict { actual } => {
                    CoreError::InvalidTransition { from: actual, to }
                }
                other => other.into(),
            })?;

        tracing::info!(order_id, ?from, ?to, actor = ?actor, "Order transitioned");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use shared::{FeeSchedule, NewOrder};

    const BUYER: &str = "buyer-1";
    const TRAVELER: &str = "traveler-1";

    async fn seed(store: &MemoryStore) -> Order {
        store
            .insert_order(NewOrder::new(
                "trip-1",
                BUYER,
                TRAVELER,
                "Sepatu Nike",
                1_500_000,
                FeeSchedule::default(),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_traveler_accepts_pending_order() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        let updated = machine
            .transition(&order.id, OrderStatus::Accepted, TRAVELER)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Accepted);
    }

    #[tokio::test]
    async fn test_traveler_rejects_pending_order() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        let updated = machine
            .transition(&order.id, OrderStatus::Rejected, TRAVELER)
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Rejected);

        // Terminal: nothing moves out of rejected.
        let result = machine
            .transition(&order.id, OrderStatus::Accepted, TRAVELER)
            .await;
        assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    }

    #[tokio::test]
    async fn test_buyer_cannot_accept_own_request() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        let result = machine
            .transition(&order.id, OrderStatus::Accepted, BUYER)
            .await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));

        // Status must be unchanged after the refusal.
        let current = store.get_order(&order.id).await.unwrap();
        assert_eq!(current.status, OrderStatus::PendingPayment);
    }

    #[tokio::test]
    async fn test_stranger_is_unauthorized_even_on_valid_edge() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        let result = machine
            .transition(&order.id, OrderStatus::Accepted, "stranger")
            .await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_off_table_edge_is_invalid_transition() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        let result = machine
            .transition(&order.id, OrderStatus::Shipped, TRAVELER)
            .await;
        assert!(matches!(
            result,
            Err(CoreError::InvalidTransition {
                from: OrderStatus::PendingPayment,
                to: OrderStatus::Shipped,
            })
        ));
    }

    #[tokio::test]
    async fn test_unknown_order_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store);

        let result = machine
            .transition("nonexistent", OrderStatus::Accepted, TRAVELER)
            .await;
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_lost_race_reports_invalid_transition() {
        let store = Arc::new(MemoryStore::new());
        let machine = OrderStateMachine::new(store.clone());
        let order = seed(&store).await;

        // Another actor lands accept between our read and our write:
        // simulated by mutating the store directly.
        store
            .update_order_status(
                &order.id,
                OrderStatus::PendingPayment,
                OrderStatus::Accepted,
                None,
            )
            .await
            .unwrap();

        let result = machine
            .transition(&order.id, OrderStatus::Rejected, TRAVELER)
            .await;
        assert!(matches!(
            result,
            Err(CoreError::InvalidTransition {
                from: OrderStatus::Accepted,
                to: OrderStatus::Rejected,
            })
        ));
    }
}
