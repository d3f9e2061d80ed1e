//! Pure domain types for the chat context.
//!
//! Messages are immutable value objects; channels are created implicitly by
//! first use and never deleted within this crate's scope.

mod channel;
mod ids;
mod message;

pub use channel::Channel;
pub use ids::{ChannelId, MessageId, UserId};
pub use message::{Message, MessageBodyError, MessageBuilder, MessageBody, SenderProfile};
