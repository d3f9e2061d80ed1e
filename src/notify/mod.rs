//! Push-notification dispatch for channel subscribers.
//!
//! Given a channel id and a message summary, this context obtains a scoped
//! bearer credential via a service-account exchange and submits a push
//! payload to the provider's topic for that channel. Dispatch is
//! best-effort by design: the relay logs and swallows failures so a missed
//! notification never affects a stored message.
//!
//! # Architecture
//!
//! - **Domain**: [`domain::TopicName`], [`domain::PushNotification`],
//!   [`domain::DeviceToken`]
//! - **Ports**: [`ports::dispatcher::NotificationDispatcher`],
//!   [`ports::token::AccessTokenSource`]
//! - **Adapters**: [`adapters::fcm::FcmDispatcher`],
//!   [`adapters::token::ServiceAccountTokenSource`],
//!   [`adapters::token::CachingTokenSource`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

#[cfg(test)]
mod tests;
