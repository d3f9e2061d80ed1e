//! The Channel record.
//!
//! Channels are created implicitly by the first message or membership
//! registration and are never deleted within this crate's scope; the record
//! exists for display purposes only.

use super::ChannelId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A chat channel.
///
/// # Examples
///
/// ```
/// use potluck_relay::chat::domain::{Channel, ChannelId};
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let channel = Channel::new(ChannelId::new("c1"), "Leftover lasagne", &clock);
/// assert_eq!(channel.name(), "Leftover lasagne");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    id: ChannelId,
    name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    created_at: DateTime<Utc>,
}

impl Channel {
    /// Creates a channel record timestamped with the clock's current time.
    #[must_use]
    pub fn new(id: ChannelId, name: impl Into<String>, clock: &impl Clock) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: clock.utc(),
        }
    }

    /// Returns the channel identifier.
    #[must_use]
    pub const fn id(&self) -> &ChannelId {
        &self.id
    }

    /// Returns the channel display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
