//! Notification dispatcher port.
//!
//! Defines the abstract interface for push fan-out, allowing the HTTP
//! provider adapter to be replaced by spies in tests.

use crate::chat::domain::ChannelId;
use crate::notify::{domain::DeviceToken, error::DispatchError};
use async_trait::async_trait;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Port for push-notification fan-out to channel topic subscribers.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    /// Sends a push notification to all subscribers of the channel's topic.
    ///
    /// The payload targets topic `group_<channelId>` with a title naming
    /// the channel and a body of `<senderName>: <messageBody>`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the credential exchange or the push
    /// request fails. The relay treats these as best-effort failures.
    async fn notify_channel(
        &self,
        channel: &ChannelId,
        sender_name: &str,
        body: &str,
    ) -> DispatchResult<()>;

    /// Registers a device token as a subscriber of the channel's topic.
    ///
    /// Idempotent: safe to call on every session start.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the registration request fails.
    async fn subscribe_topic(&self, channel: &ChannelId, device: &DeviceToken)
    -> DispatchResult<()>;
}
