//! Channel membership port: the `(channel, user) -> identifier` relation.
//!
//! The canonical document layout is `channels/{channelId}/users/{userId}`
//! with the display identifier (typically the user's email) as the value.

use crate::chat::{
    domain::{ChannelId, UserId},
    ports::store::StoreResult,
};
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Port for channel membership registration and lookup.
///
/// # Implementation Notes
///
/// Registration must be an atomic insert-if-absent: two users (or the same
/// user on two devices) registering concurrently must not clobber each
/// other or produce duplicates. Implementations over stores without a
/// conditional write should use an upsert with an idempotent value.
#[async_trait]
pub trait ChannelMembership: Send + Sync {
    /// Registers a user as a member of the channel, creating the channel's
    /// membership set implicitly on first use.
    ///
    /// Idempotent: registering an already-present user is a no-op and the
    /// stored identifier is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing relation cannot be reached.
    async fn register_member(
        &self,
        channel: &ChannelId,
        user: &UserId,
        identifier: &str,
    ) -> StoreResult<()>;

    /// Returns the display identifiers of all members of the channel.
    ///
    /// Returns an empty set (not an error) for a channel with no members.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backing relation cannot be reached.
    async fn list_members(&self, channel: &ChannelId) -> StoreResult<BTreeSet<String>>;
}
