//! Shared test helpers for in-memory adapter integration tests.

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use potluck_relay::chat::{
    adapters::memory::{InMemoryChannelMembership, InMemoryMessageStore},
    domain::{ChannelId, Message, SenderProfile, UserId},
};
use rstest::fixture;
use std::io;
use tokio::runtime::Runtime;

/// Clock pinned to a fixed instant, for deterministic message ordering.
#[derive(Debug, Clone)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Creates a clock reading the given epoch-milliseconds instant.
    #[must_use]
    pub fn at_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis).expect("valid epoch millis"))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory message store for each test.
#[fixture]
pub fn store() -> InMemoryMessageStore {
    InMemoryMessageStore::new()
}

/// Provides a fresh in-memory membership relation for each test.
#[fixture]
pub fn membership() -> InMemoryChannelMembership {
    InMemoryChannelMembership::new()
}

/// Provides a channel ID for tests.
#[fixture]
pub fn channel() -> ChannelId {
    ChannelId::new("c1")
}

/// Provides a sender profile for tests.
#[fixture]
pub fn sender() -> SenderProfile {
    SenderProfile::new(UserId::new("uid-1"), "Alice")
}

/// Builds a text message timestamped at the given epoch-milliseconds instant.
#[must_use]
pub fn text_message_at(sender: &SenderProfile, text: &str, millis: i64) -> Message {
    Message::text(sender, text, &FixedClock::at_millis(millis))
}
