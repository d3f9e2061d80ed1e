//! Port traits for the chat context.
//!
//! Ports define the abstract interfaces the relay depends on; adapters
//! provide concrete implementations (in-memory for tests and single-node
//! deployments, remote document stores elsewhere).

pub mod membership;
pub mod store;
