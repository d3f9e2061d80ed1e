//! Domain types for push-notification dispatch.

use crate::chat::domain::ChannelId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A push topic name in the provider's namespace.
///
/// Channel topics use the `group_<channelId>` convention so every member
/// device subscribed to the channel receives its notifications.
///
/// # Examples
///
/// ```
/// use potluck_relay::chat::domain::ChannelId;
/// use potluck_relay::notify::domain::TopicName;
///
/// let topic = TopicName::for_channel(&ChannelId::new("c1"));
/// assert_eq!(topic.as_str(), "group_c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicName(String);

impl TopicName {
    /// Returns the topic for a channel's group notifications.
    #[must_use]
    pub fn for_channel(channel: &ChannelId) -> Self {
        Self(format!("group_{channel}"))
    }

    /// Returns the topic name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An opaque push-provider registration token identifying a client device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Creates a device token from the provider's registration token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The user-visible content of a push notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushNotification {
    title: String,
    body: String,
}

impl PushNotification {
    /// Creates a notification with an explicit title and body.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Composes the notification for a new channel message.
    ///
    /// Matches the app's established copy: the title names the channel,
    /// the body is the sender name and message summary.
    ///
    /// # Examples
    ///
    /// ```
    /// use potluck_relay::chat::domain::ChannelId;
    /// use potluck_relay::notify::domain::PushNotification;
    ///
    /// let push = PushNotification::for_channel_message(&ChannelId::new("c1"), "Alice", "hi");
    /// assert_eq!(push.title(), "New message in c1");
    /// assert_eq!(push.body(), "Alice: hi");
    /// ```
    #[must_use]
    pub fn for_channel_message(channel: &ChannelId, sender_name: &str, summary: &str) -> Self {
        Self {
            title: format!("New message in {channel}"),
            body: format!("{sender_name}: {summary}"),
        }
    }

    /// Returns the notification title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the notification body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}
