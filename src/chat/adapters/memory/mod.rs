//! In-memory implementations of the chat ports.
//!
//! Thread-safe, process-local adapters suitable for tests and single-node
//! deployments. Hosted document-tree adapters live in deployment-specific
//! crates.

mod membership;
mod store;

pub use membership::InMemoryChannelMembership;
pub use store::InMemoryMessageStore;
