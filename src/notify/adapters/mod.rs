//! Adapters implementing the notification context's ports.

pub mod fcm;
pub mod token;
