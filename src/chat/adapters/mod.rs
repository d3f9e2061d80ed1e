//! Adapters implementing the chat context's ports.

pub mod memory;
