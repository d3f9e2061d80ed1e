//! Unit tests for notification domain types and credential handling.

mod token_tests;
