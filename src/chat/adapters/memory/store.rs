//! In-memory implementation of the [`MessageStore`] port.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::chat::{
    domain::{ChannelId, Message, MessageId},
    error::StoreError,
    ports::store::{MessageFeed, MessageStore, StoreResult},
};

/// How many undelivered updates a single feed may buffer before it is
/// cancelled as lagged.
const DEFAULT_UPDATE_CAPACITY: usize = 256;

/// Per-channel log state: the ordered messages, the id set for duplicate
/// detection, and the live-update fan-out.
#[derive(Debug)]
struct ChannelLog {
    messages: Vec<Message>,
    ids: HashSet<MessageId>,
    updates: broadcast::Sender<Message>,
}

impl ChannelLog {
    fn new(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            messages: Vec::new(),
            ids: HashSet::new(),
            updates,
        }
    }
}

/// In-memory implementation of [`MessageStore`].
///
/// Thread-safe via an internal [`RwLock`]; cloning shares the same log.
/// Messages are held ordered by `created_at` with insertion order breaking
/// ties, so snapshots are cheap clones.
///
/// # Example
///
/// ```
/// use potluck_relay::chat::adapters::memory::InMemoryMessageStore;
/// use potluck_relay::chat::ports::store::MessageStore;
///
/// let store = InMemoryMessageStore::new();
/// // Use store in tests or single-node deployments...
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryMessageStore {
    channels: Arc<RwLock<HashMap<ChannelId, ChannelLog>>>,
    update_capacity: usize,
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMessageStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_update_capacity(DEFAULT_UPDATE_CAPACITY)
    }

    /// Creates an empty store with a specific per-feed update buffer size.
    ///
    /// A consumer that falls more than `capacity` messages behind has its
    /// feed cancelled as lagged and must re-subscribe.
    #[must_use]
    pub fn with_update_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            update_capacity: capacity,
        }
    }

    /// Returns the number of messages stored in the channel.
    ///
    /// Returns `0` if the internal lock is poisoned, matching the fallback
    /// behaviour of an empty log. For error-propagating access, use the
    /// store trait methods instead.
    #[must_use]
    pub fn channel_len(&self, channel: &ChannelId) -> usize {
        self.channels
            .read()
            .map(|guard| guard.get(channel).map_or(0, |log| log.messages.len()))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, channel: &ChannelId, message: Message) -> StoreResult<MessageId> {
        let mut guard = self
            .channels
            .write()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        let log = guard
            .entry(channel.clone())
            .or_insert_with(|| ChannelLog::new(self.update_capacity));

        let id = message.id();
        if log.ids.contains(&id) {
            return Err(StoreError::DuplicateMessage(id));
        }

        // Insert after all messages with the same or earlier timestamp so
        // ties keep insertion order.
        let position = log
            .messages
            .partition_point(|m| m.created_at() <= message.created_at());
        log.messages.insert(position, message.clone());
        log.ids.insert(id);

        // Nobody listening is fine; the log is the source of truth.
        drop(log.updates.send(message));

        Ok(id)
    }

    async fn snapshot(&self, channel: &ChannelId) -> StoreResult<Vec<Message>> {
        let guard = self
            .channels
            .read()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        Ok(guard
            .get(channel)
            .map(|log| log.messages.clone())
            .unwrap_or_default())
    }

    async fn subscribe(&self, channel: &ChannelId) -> StoreResult<MessageFeed> {
        // The write lock keeps the snapshot and the receiver registration
        // gap-free: appends cannot interleave between the two.
        let mut guard = self
            .channels
            .write()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        let log = guard
            .entry(channel.clone())
            .or_insert_with(|| ChannelLog::new(self.update_capacity));

        Ok(MessageFeed::new(
            log.messages.clone(),
            log.updates.subscribe(),
        ))
    }
}
