//! Unit tests for chat domain types.
