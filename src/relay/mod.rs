//! The relay service orchestrating a message send end to end.
//!
//! A send moves through `Pending -> Stored -> NotifyAttempted`: the message
//! is appended to the channel log first, and only a successful append
//! triggers the push fan-out. Notification failure never reverts a stored
//! message.

pub mod error;
pub mod retry;
pub mod service;

pub use error::RelayError;
pub use retry::RetryPolicy;
pub use service::{ChatRelay, NotifyHandle, NotifyOutcome, SendParams, SendReceipt, Subscriber};

#[cfg(test)]
mod tests;
