//! Shared fixtures for unit tests
//!
//! Integration tests under `tests/` build their own hierarchies through the public API.

pub mod factories;
