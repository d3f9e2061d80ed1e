//! In-memory implementation of the [`ChannelMembership`] port.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::chat::{
    domain::{ChannelId, UserId},
    error::StoreError,
    ports::{membership::ChannelMembership, store::StoreResult},
};

/// In-memory implementation of [`ChannelMembership`].
///
/// Registration is an atomic insert-if-absent under the write lock, so
/// concurrent first-joins of the same channel cannot clobber each other.
///
/// # Example
///
/// ```
/// use potluck_relay::chat::adapters::memory::InMemoryChannelMembership;
/// use potluck_relay::chat::ports::membership::ChannelMembership;
///
/// let membership = InMemoryChannelMembership::new();
/// // Use membership in tests or single-node deployments...
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryChannelMembership {
    channels: Arc<RwLock<HashMap<ChannelId, BTreeMap<UserId, String>>>>,
}

impl InMemoryChannelMembership {
    /// Creates an empty membership relation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChannelMembership for InMemoryChannelMembership {
    async fn register_member(
        &self,
        channel: &ChannelId,
        user: &UserId,
        identifier: &str,
    ) -> StoreResult<()> {
        let mut guard = self
            .channels
            .write()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        guard
            .entry(channel.clone())
            .or_default()
            .entry(user.clone())
            .or_insert_with(|| identifier.to_owned());

        Ok(())
    }

    async fn list_members(&self, channel: &ChannelId) -> StoreResult<BTreeSet<String>> {
        let guard = self
            .channels
            .read()
            .map_err(|e| StoreError::unavailable(format!("lock poisoned: {e}")))?;

        Ok(guard
            .get(channel)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default())
    }
}
