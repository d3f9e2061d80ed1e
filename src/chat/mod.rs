//! Message log and channel membership for the relay pipeline.
//!
//! This module implements the chat side of the pipeline: the per-channel
//! ordered message log with its live subscription feed, and the channel
//! membership relation.
//!
//! # Architecture
//!
//! The module follows hexagonal architecture principles:
//!
//! - **Domain**: Pure domain types ([`domain::Message`], [`domain::Channel`],
//!   [`domain::MessageBody`], id newtypes)
//! - **Ports**: Abstract trait interfaces ([`ports::store::MessageStore`],
//!   [`ports::membership::ChannelMembership`])
//! - **Adapters**: Concrete implementations
//!   ([`adapters::memory::InMemoryMessageStore`],
//!   [`adapters::memory::InMemoryChannelMembership`])
//!
//! # Example
//!
//! ```
//! use potluck_relay::chat::domain::{ChannelId, Message, SenderProfile, UserId};
//! use mockable::DefaultClock;
//!
//! let clock = DefaultClock;
//! let sender = SenderProfile::new(UserId::new("user-1"), "Alice");
//! let message = Message::text(&sender, "Soup's on!", &clock);
//! assert_eq!(message.sender_name(), "Alice");
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

#[cfg(test)]
mod tests;
