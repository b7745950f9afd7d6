//! ChatChannel - ordered, duplicate-free view of one order's messages
//!
//! Combines the stored history with the store's live insert feed and the
//! viewer's own sends into a single sequence ordered by `(created_at, id)`.
//! The transport may redeliver or reorder; a message whose id is already
//! present is dropped. The presentation layer only ever folds the emitted
//! events into a list, it never touches raw transport callbacks.
//!
//! Sends are optimistic about the input, not the list: the draft is
//! drained before the store call and restored on failure, and no entry is
//! added to the sequence until the store confirms the write.

use crate::store::OrderStore;
use shared::{CoreError, CoreResult, Message, Role};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Event emitted by [`ChatChannel::next_event`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// A new message was merged into the sequence
    Received(Message),
    /// The feed lagged behind; history was refetched from the store
    Resynced,
    /// The feed lagged and the history refetch failed: messages skipped
    /// by the lag are missing until [`ChatChannel::resync`] succeeds
    ResyncFailed,
}

pub struct ChatChannel<S> {
    store: Arc<S>,
    order_id: String,
    viewer_id: String,
    messages: Vec<Message>,
    seen: HashSet<String>,
    draft: String,
    feed: broadcast::Receiver<Message>,
}

impl<S: OrderStore> ChatChannel<S> {
    /// Open the channel for one order: authorize the viewer, load the
    /// ordered history, and subscribe to new inserts. Dropping the
    /// returned channel releases the subscription.
    pub async fn open(store: Arc<S>, order_id: &str, viewer_id: &str) -> CoreResult<Self> {
        let order = store.get_order(order_id).await?;
        if Role::of(&order, viewer_id).is_none() {
            return Err(CoreError::Unauthorized(format!(
                "{viewer_id} is not a party of order {order_id}"
            )));
        }

        // Subscribe before the history read so an insert landing between
        // the two is seen on the feed (and deduplicated if it made the
        // read as well).
        let feed = store.subscribe_messages(order_id);
        let mut channel = Self {
            store,
            order_id: order_id.to_string(),
            viewer_id: viewer_id.to_string(),
            messages: Vec::new(),
            seen: HashSet::new(),
            draft: String::new(),
            feed,
        };
        channel.reload_history().await?;
        tracing::debug!(order_id, viewer_id, "Chat channel opened");
        Ok(channel)
    }

    /// The merged sequence, ascending by `(created_at, id)`.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Send the current draft. The draft is cleared before the store call;
    /// if the store rejects the write it is restored and the sequence is
    /// left untouched. A blank draft is a no-op.
    pub async fn send(&mut self) -> CoreResult<Option<Message>> {
        if self.draft.trim().is_empty() {
            return Ok(None);
        }
        let content = std::mem::take(&mut self.draft);

        match self
            .store
            .insert_message(&self.order_id, &self.viewer_id, &content)
            .await
        {
            Ok(message) => {
                self.merge(message.clone());
                Ok(Some(message))
            }
            Err(e) => {
                self.draft = content;
                tracing::warn!(order_id = %self.order_id, error = %e, "Send failed, draft restored");
                Err(e.into())
            }
        }
    }

    /// Wait for the next feed event. Duplicates and foreign-order
    /// deliveries are swallowed; a lagged feed triggers a history resync,
    /// reported as [`ChatEvent::Resynced`] or [`ChatEvent::ResyncFailed`]
    /// so the presentation layer can offer a manual refresh. Returns
    /// `None` once the store side of the feed is gone.
    pub async fn next_event(&mut self) -> Option<ChatEvent> {
        loop {
            match self.feed.recv().await {
                Ok(message) => {
                    if message.order_id != self.order_id {
                        continue;
                    }
                    if self.merge(message.clone()) {
                        return Some(ChatEvent::Received(message));
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        order_id = %self.order_id,
                        skipped,
                        "Chat feed lagged, refetching history"
                    );
                    match self.reload_history().await {
                        Ok(()) => return Some(ChatEvent::Resynced),
                        Err(e) => {
                            tracing::error!(order_id = %self.order_id, error = %e, "Resync failed");
                            return Some(ChatEvent::ResyncFailed);
                        }
                    }
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Refetch the full history, replacing the merged sequence. Manual
    /// recovery path after [`ChatEvent::ResyncFailed`].
    pub async fn resync(&mut self) -> CoreResult<()> {
        self.reload_history().await
    }

    /// Insert a message at its sorted position unless its id is already
    /// present. Returns whether the sequence changed.
    fn merge(&mut self, message: Message) -> bool {
        if !self.seen.insert(message.id.clone()) {
            return false;
        }
        let at = self
            .messages
            .partition_point(|m| m.sort_key() <= message.sort_key());
        self.messages.insert(at, message);
        true
    }

    async fn reload_history(&mut self) -> CoreResult<()> {
        let history = self.store.messages(&self.order_id).await?;
        self.messages.clear();
        self.seen.clear();
        for message in history {
            self.merge(message);
        }
        Ok(())
    }
}
