//! Error types for the chat context.
//!
//! Uses `thiserror` for ergonomic error handling with typed variants
//! that can be inspected by callers.

use super::domain::MessageId;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur when reading from or writing to the message log
/// or the membership relation.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing log could not be reached.
    ///
    /// This is the transient case: the relay retries it with bounded
    /// backoff before surfacing it to the caller.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A message with this id already exists in the channel.
    ///
    /// Appends never overwrite; the existing message is left untouched.
    #[error("duplicate message: {0}")]
    DuplicateMessage(MessageId),

    /// An underlying adapter error occurred.
    #[error("store error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Creates an unavailable error from a description of the outage.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }

    /// Creates a backend error from any error type.
    #[must_use]
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }

    /// Returns `true` if the operation may succeed when retried.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Errors terminating a live message feed.
///
/// Feed errors are delivered in-band as the final event of a feed rather
/// than silently ending the stream; the consumer is expected to
/// re-subscribe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// The listener was cancelled by the server or transport.
    #[error("listener cancelled: {0}")]
    Cancelled(String),

    /// The consumer fell too far behind and missed updates.
    ///
    /// A re-subscribe delivers a fresh snapshot including the missed
    /// messages.
    #[error("feed lagged behind by {missed} messages")]
    Lagged {
        /// How many messages were dropped before the consumer caught up.
        missed: u64,
    },
}
