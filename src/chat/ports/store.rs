//! Message store port: the append-only per-channel ordered log.
//!
//! Defines the abstract interface for persisting and observing messages,
//! allowing different backing logs (hosted document tree, in-memory, etc.).
//! The canonical document layout is `messages/{channelId}/{messageId}`.

use crate::chat::{
    domain::{ChannelId, Message, MessageId},
    error::{FeedError, StoreError},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::broadcast;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Port for the per-channel message log.
///
/// # Implementation Notes
///
/// Implementations must ensure:
/// - Message ids are unique within a channel; an append with an existing id
///   fails with [`StoreError::DuplicateMessage`] and never overwrites
/// - Messages are immutable after storage (no update or delete operations)
/// - Reads are ordered by `created_at` ascending; messages sharing a
///   timestamp keep insertion order, stable for the lifetime of a single
///   snapshot
/// - A subscription observes every append made after its snapshot was taken,
///   with no gap between the two
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Appends a message to the channel's log, creating the channel
    /// implicitly on first use.
    ///
    /// Returns the id under which the message was stored.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if:
    /// - The backing log cannot be reached ([`StoreError::Unavailable`])
    /// - A message with the same id already exists in the channel
    ///   ([`StoreError::DuplicateMessage`])
    async fn append(&self, channel: &ChannelId, message: Message) -> StoreResult<MessageId>;

    /// Returns a one-shot ordered snapshot of the channel's log.
    ///
    /// Returns an empty vector for a channel with no messages.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing log cannot be reached.
    async fn snapshot(&self, channel: &ChannelId) -> StoreResult<Vec<Message>>;

    /// Opens a live feed over the channel's log.
    ///
    /// The feed delivers the full current snapshot first, then incremental
    /// updates as messages are appended. Transport failures are signalled
    /// in-band as a [`FeedEvent::Cancelled`] terminal event; the caller
    /// re-subscribes to recover, receiving a fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing log cannot be reached.
    async fn subscribe(&self, channel: &ChannelId) -> StoreResult<MessageFeed>;
}

/// An event observed on a live message feed.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    /// A message from the snapshot or a subsequent append.
    Message(Message),

    /// The feed terminated abnormally; no further events follow.
    Cancelled(FeedError),
}

/// Handle to a live, cancellable message feed.
///
/// Obtained from [`MessageStore::subscribe`]. The handle owns its listener
/// registration: dropping it or calling [`MessageFeed::close`] releases the
/// underlying subscription, so repeated feed opens do not accumulate
/// listeners.
///
/// # Examples
///
/// ```no_run
/// # use potluck_relay::chat::ports::store::{FeedEvent, MessageFeed};
/// # async fn consume(mut feed: MessageFeed) {
/// while let Some(event) = feed.next().await {
///     match event {
///         FeedEvent::Message(message) => { /* render */ }
///         FeedEvent::Cancelled(err) => { /* re-subscribe */ }
///     }
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct MessageFeed {
    backlog: VecDeque<Message>,
    updates: Option<broadcast::Receiver<Message>>,
}

impl MessageFeed {
    /// Creates a feed from an ordered snapshot and a live update receiver.
    ///
    /// Adapters must take the snapshot and register the receiver without a
    /// gap in between, so no append is missed or duplicated.
    #[must_use]
    pub fn new(snapshot: Vec<Message>, updates: broadcast::Receiver<Message>) -> Self {
        Self {
            backlog: snapshot.into(),
            updates: Some(updates),
        }
    }

    /// Waits for the next feed event.
    ///
    /// Snapshot messages drain first, then live updates. Returns `None`
    /// once the feed is closed, or after a [`FeedEvent::Cancelled`] event
    /// has been delivered.
    pub async fn next(&mut self) -> Option<FeedEvent> {
        if let Some(message) = self.backlog.pop_front() {
            return Some(FeedEvent::Message(message));
        }

        let updates = self.updates.as_mut()?;
        match updates.recv().await {
            Ok(message) => Some(FeedEvent::Message(message)),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                self.close();
                Some(FeedEvent::Cancelled(FeedError::Lagged { missed }))
            }
            Err(broadcast::error::RecvError::Closed) => {
                self.close();
                Some(FeedEvent::Cancelled(FeedError::Cancelled(
                    "log closed the subscription".into(),
                )))
            }
        }
    }

    /// Closes the feed, releasing the underlying listener registration.
    ///
    /// Safe to call more than once. Any undelivered snapshot messages are
    /// discarded.
    pub fn close(&mut self) {
        self.backlog.clear();
        self.updates = None;
    }

    /// Returns `true` if the feed has been closed or cancelled.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.updates.is_none()
    }
}
