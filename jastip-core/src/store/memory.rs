//! In-memory store
//!
//! In-process implementation of [`OrderStore`] and [`BlobStore`] for
//! tests and embedded use. Honors the same contracts as a real backend:
//! conditional status updates, party-only message inserts, and a
//! per-order broadcast feed of inserted messages.

use super::{BlobStore, OrderStore, StoreError, StoreResult};
use crate::config::Config;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::{Message, NewOrder, NewTrip, Order, OrderStatus, Trip};
use std::sync::Arc;
use tokio::sync::broadcast;
use validator::Validate;

/// Default capacity of each per-order insert feed
const FEED_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct MemoryStore {
    orders: Arc<DashMap<String, Order>>,
    /// Append-only message log per order
    messages: Arc<DashMap<String, Vec<Message>>>,
    trips: Arc<DashMap<String, Trip>>,
    /// Per-order insert feeds, created lazily on first subscribe or send
    feeds: Arc<DashMap<String, broadcast::Sender<Message>>>,
    /// Blob content keyed by `bucket/key`
    blobs: Arc<DashMap<String, (Vec<u8>, String)>>,
    feed_capacity: usize,
    /// Monotonic insertion counter, folded into generated ids so equal
    /// timestamps still order deterministically
    seq: Arc<RwLock<u64>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_feed_capacity(FEED_CAPACITY)
    }

    /// Build a store honoring the configured feed capacity.
    pub fn with_config(config: &Config) -> Self {
        Self::with_feed_capacity(config.chat_channel_capacity)
    }

    pub fn with_feed_capacity(feed_capacity: usize) -> Self {
        Self {
            orders: Arc::new(DashMap::new()),
            messages: Arc::new(DashMap::new()),
            trips: Arc::new(DashMap::new()),
            feeds: Arc::new(DashMap::new()),
            blobs: Arc::new(DashMap::new()),
            feed_capacity,
            seq: Arc::new(RwLock::new(0)),
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut seq = self.seq.write();
        *seq += 1;
        format!("{}-{:08}-{}", prefix, *seq, uuid::Uuid::new_v4())
    }

    fn feed(&self, order_id: &str) -> broadcast::Sender<Message> {
        self.feeds
            .entry(order_id.to_string())
            .or_insert_with(|| broadcast::channel(self.feed_capacity).0)
            .clone()
    }

    /// Blob count, for orphan inspection in tests.
    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    pub fn blob(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.blobs
            .get(&format!("{bucket}/{key}"))
            .map(|entry| entry.0.clone())
    }
}

#[async_trait]
impl OrderStore for MemoryStore {
    async fn insert_order(&self, order: NewOrder) -> StoreResult<Order> {
        order
            .validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        let record = Order {
            id: self.next_id("order"),
            trip_id: order.trip_id,
            buyer_id: order.buyer_id,
            traveler_id: order.traveler_id,
            item_name: order.item_name,
            item_price: order.item_price,
            jastip_fee: order.jastip_fee,
            platform_fee: order.platform_fee,
            total_amount: order.total_amount,
            status: OrderStatus::PendingPayment,
            payment_proof_url: None,
            created_at: Utc::now(),
        };
        self.orders.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn get_order(&self, order_id: &str) -> StoreResult<Order> {
        self.orders
            .get(order_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| StoreError::NotFound(format!("order {order_id}")))
    }

    async fn orders_for_user(&self, user_id: &str) -> StoreResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| entry.buyer_id == user_id || entry.traveler_id == user_id)
            .map(|entry| entry.clone())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        expected: OrderStatus,
        new: OrderStatus,
        proof_url: Option<String>,
    ) -> StoreResult<Order> {
        let mut entry = self
            .orders
            .get_mut(order_id)
            .ok_or_else(|| StoreError::NotFound(format!("order {order_id}")))?;
        if entry.status != expected {
            return Err(StoreError::Conflict {
                actual: entry.status,
            });
        }
        entry.status = new;
        if let Some(url) = proof_url {
            entry.payment_proof_url = Some(url);
        }
        Ok(entry.clone())
    }

    async fn insert_message(
        &self,
        order_id: &str,
        sender_id: &str,
        content: &str,
    ) -> StoreResult<Message> {
        if content.trim().is_empty() {
            return Err(StoreError::Invalid("message content is required".into()));
        }
        let order = self.get_order(order_id).await?;
        if sender_id != order.buyer_id && sender_id != order.traveler_id {
            return Err(StoreError::Denied(format!(
                "sender {sender_id} is not a party of order {order_id}"
            )));
        }
        let message = Message {
            id: self.next_id("msg"),
            order_id: order_id.to_string(),
            sender_id: sender_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.messages
            .entry(order_id.to_string())
            .or_default()
            .push(message.clone());
        // Listeners may be gone; an unobserved insert is not an error.
        let _ = self.feed(order_id).send(message.clone());
        Ok(message)
    }

    async fn messages(&self, order_id: &str) -> StoreResult<Vec<Message>> {
        let mut log = self
            .messages
            .get(order_id)
            .map(|entry| entry.clone())
            .unwrap_or_default();
        log.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(log)
    }

    fn subscribe_messages(&self, order_id: &str) -> broadcast::Receiver<Message> {
        self.feed(order_id).subscribe()
    }

    async fn insert_trip(&self, trip: NewTrip) -> StoreResult<Trip> {
        trip.validate()
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        let record = Trip {
            id: self.next_id("trip"),
            traveler_id: trip.traveler_id,
            origin_city: trip.origin_city,
            destination_province: trip.destination_province,
            departure_date: trip.departure_date,
            created_at: Utc::now(),
        };
        self.trips.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn trips(&self) -> StoreResult<Vec<Trip>> {
        let mut trips: Vec<Trip> = self.trips.iter().map(|entry| entry.clone()).collect();
        trips.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(trips)
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> StoreResult<()> {
        self.blobs.insert(
            format!("{bucket}/{key}"),
            (bytes.to_vec(), content_type.to_string()),
        );
        Ok(())
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("memory://{bucket}/{key}")
    }
}
