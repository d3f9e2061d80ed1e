//! Potluck Relay: message relay and notification dispatch for group chat.
//!
//! This crate implements the chat pipeline behind the Potluck food-sharing
//! app: an append-only per-channel message log with a live subscription
//! feed, idempotent channel membership, and best-effort push-notification
//! fan-out through an FCM-compatible provider.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure chat and notification types with no infrastructure
//!   dependencies
//! - **Ports**: Abstract trait interfaces for the message log, membership
//!   relation, push provider, and credential exchange
//! - **Adapters**: Concrete implementations of ports (in-memory log, FCM
//!   HTTP client, OAuth token source)
//!
//! # Modules
//!
//! - [`chat`]: Message log, live feed, and channel membership
//! - [`notify`]: Push-notification dispatch and credential handling
//! - [`relay`]: The `ChatRelay` service orchestrating a send end to end
//! - [`config`]: Environment-driven deployment configuration

pub mod chat;
pub mod config;
pub mod notify;
pub mod relay;
