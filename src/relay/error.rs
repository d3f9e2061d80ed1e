//! Relay-level error surface.

use crate::chat::{domain::MessageBodyError, error::StoreError};
use thiserror::Error;

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors surfaced to callers of the relay.
///
/// Notification failures are deliberately absent: dispatch is best-effort
/// and its failures are logged, never surfaced to the sender.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The send request did not resolve to a valid message body.
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] MessageBodyError),

    /// The message log or membership relation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
