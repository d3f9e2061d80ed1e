//! Unit tests for the relay service and its retry policy.
