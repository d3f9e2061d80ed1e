//! Port traits for the notification context.

pub mod dispatcher;
pub mod token;
