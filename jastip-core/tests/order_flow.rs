//! End-to-end lifecycle scenarios on the in-memory store:
//! request -> accept -> proof -> escrow -> purchased -> shipped -> completed,
//! with the chat channel running alongside.

use jastip_core::{
    ChatChannel, ChatEvent, Config, CoreError, FeeSchedule, MemoryStore, Order, OrderStateMachine,
    OrderStatus, OrderStore, PaymentProofWorkflow,
};
use shared::NewOrder;
use std::sync::Arc;

const BUYER: &str = "buyer-1";
const TRAVELER: &str = "traveler-1";

const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("jastip_core=debug")
        .with_test_writer()
        .try_init();
}

async fn place_order(store: &MemoryStore) -> Order {
    store
        .insert_order(NewOrder::new(
            "trip-1",
            BUYER,
            TRAVELER,
            "Sepatu Nike Air Jordan size 42",
            1_500_000,
            FeeSchedule::default(),
        ))
        .await
        .unwrap()
}

#[tokio::test]
async fn full_happy_path_through_completion() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let machine = OrderStateMachine::new(store.clone());
    let proofs = PaymentProofWorkflow::new(store.clone(), store.clone(), &Config::default());

    let order = place_order(&store).await;
    assert_eq!(order.status, OrderStatus::PendingPayment);
    assert_eq!(order.total_amount, 1_500_000 + 25_000 + 5_000);

    // Traveler accepts.
    let order = machine
        .transition(&order.id, OrderStatus::Accepted, TRAVELER)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Accepted);
    assert!(order.payment_proof_url.is_none());

    // Buyer uploads the transfer receipt; proof URL and escrow move land
    // together.
    let order = proofs.attach_proof(&order.id, BUYER, PNG_MAGIC).await.unwrap();
    assert_eq!(order.status, OrderStatus::PaidEscrow);
    assert!(order.payment_proof_url.is_some());

    // Traveler confirms purchase, then shipment.
    let order = machine
        .transition(&order.id, OrderStatus::Purchased, TRAVELER)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Purchased);
    let order = machine
        .transition(&order.id, OrderStatus::Shipped, TRAVELER)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    // Buyer confirms receipt.
    let order = machine
        .transition(&order.id, OrderStatus::Completed, BUYER)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Completed);

    // Completed is terminal: every further attempt is an invalid
    // transition, whoever asks.
    for (to, actor) in [
        (OrderStatus::PendingPayment, TRAVELER),
        (OrderStatus::Accepted, TRAVELER),
        (OrderStatus::PaidEscrow, BUYER),
        (OrderStatus::Shipped, TRAVELER),
        (OrderStatus::Completed, BUYER),
    ] {
        let result = machine.transition(&order.id, to, actor).await;
        assert!(
            matches!(result, Err(CoreError::InvalidTransition { .. })),
            "expected InvalidTransition for -> {to:?}"
        );
    }
}

#[tokio::test]
async fn wrong_role_never_moves_the_order() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let machine = OrderStateMachine::new(store.clone());

    let order = place_order(&store).await;

    // Buyer tries to do the traveler's steps, traveler the buyer's.
    let attempts = [
        (OrderStatus::Accepted, BUYER),
        (OrderStatus::Rejected, BUYER),
    ];
    for (to, actor) in attempts {
        let result = machine.transition(&order.id, to, actor).await;
        assert!(matches!(result, Err(CoreError::Unauthorized(_))));
        let current = store.get_order(&order.id).await.unwrap();
        assert_eq!(current.status, OrderStatus::PendingPayment);
    }

    machine
        .transition(&order.id, OrderStatus::Accepted, TRAVELER)
        .await
        .unwrap();
    let result = machine
        .transition(&order.id, OrderStatus::PaidEscrow, TRAVELER)
        .await;
    assert!(matches!(result, Err(CoreError::Unauthorized(_))));
    let current = store.get_order(&order.id).await.unwrap();
    assert_eq!(current.status, OrderStatus::Accepted);
    assert!(current.payment_proof_url.is_none());
}

#[tokio::test]
async fn rejection_ends_the_lifecycle() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let machine = OrderStateMachine::new(store.clone());
    let proofs = PaymentProofWorkflow::new(store.clone(), store.clone(), &Config::default());

    let order = place_order(&store).await;
    machine
        .transition(&order.id, OrderStatus::Rejected, TRAVELER)
        .await
        .unwrap();

    // Neither a late accept nor a proof upload gets anywhere.
    let result = machine
        .transition(&order.id, OrderStatus::Accepted, TRAVELER)
        .await;
    assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    let result = proofs.attach_proof(&order.id, BUYER, PNG_MAGIC).await;
    assert!(matches!(result, Err(CoreError::InvalidTransition { .. })));
    assert_eq!(store.blob_count(), 0);
}

#[tokio::test]
async fn proof_upload_while_pending_leaves_order_untouched() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let proofs = PaymentProofWorkflow::new(store.clone(), store.clone(), &Config::default());

    let order = place_order(&store).await;
    let result = proofs.attach_proof(&order.id, BUYER, PNG_MAGIC).await;
    assert!(matches!(
        result,
        Err(CoreError::InvalidTransition {
            from: OrderStatus::PendingPayment,
            to: OrderStatus::PaidEscrow,
        })
    ));

    let current = store.get_order(&order.id).await.unwrap();
    assert_eq!(current.status, OrderStatus::PendingPayment);
    assert!(current.payment_proof_url.is_none());
    assert_eq!(store.blob_count(), 0);
}

#[tokio::test]
async fn both_parties_chat_while_the_order_progresses() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let machine = OrderStateMachine::new(store.clone());

    let order = place_order(&store).await;
    let mut buyer_chat = ChatChannel::open(store.clone(), &order.id, BUYER).await.unwrap();
    let mut traveler_chat = ChatChannel::open(store.clone(), &order.id, TRAVELER)
        .await
        .unwrap();

    buyer_chat.set_draft("Kak, bisa titip sepatu?");
    let sent = buyer_chat.send().await.unwrap().unwrap();

    // Traveler sees the buyer's message, replies, accepts the order.
    let event = traveler_chat.next_event().await.unwrap();
    assert_eq!(event, ChatEvent::Received(sent));
    traveler_chat.set_draft("Bisa, aku terima ya");
    traveler_chat.send().await.unwrap();
    machine
        .transition(&order.id, OrderStatus::Accepted, TRAVELER)
        .await
        .unwrap();

    let event = buyer_chat.next_event().await.unwrap();
    match event {
        ChatEvent::Received(message) => assert_eq!(message.sender_id, TRAVELER),
        other => panic!("expected a received message, got {other:?}"),
    }

    // Both views converge on the same ordered sequence.
    assert_eq!(buyer_chat.messages().len(), 2);
    assert_eq!(traveler_chat.messages().len(), 2);
    let buyer_ids: Vec<&str> = buyer_chat.messages().iter().map(|m| m.id.as_str()).collect();
    let traveler_ids: Vec<&str> = traveler_chat
        .messages()
        .iter()
        .map(|m| m.id.as_str())
        .collect();
    assert_eq!(buyer_ids, traveler_ids);

    // Closing the buyer's channel does not disturb the traveler's.
    drop(buyer_chat);
    traveler_chat.set_draft("Transfer kapan?");
    assert!(traveler_chat.send().await.unwrap().is_some());
}

#[tokio::test]
async fn orders_list_shows_both_sides_newest_first() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());

    let first = place_order(&store).await;
    let second = store
        .insert_order(NewOrder::new(
            "trip-2",
            BUYER,
            "traveler-2",
            "Tokyo Banana",
            120_000,
            FeeSchedule::default(),
        ))
        .await
        .unwrap();

    let buyer_view = store.orders_for_user(BUYER).await.unwrap();
    assert_eq!(buyer_view.len(), 2);
    assert_eq!(buyer_view[0].id, second.id);
    assert_eq!(buyer_view[1].id, first.id);

    let traveler_view = store.orders_for_user(TRAVELER).await.unwrap();
    assert_eq!(traveler_view.len(), 1);
    assert_eq!(traveler_view[0].id, first.id);
}
