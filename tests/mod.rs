//! Test organization for the duel session server
//!
//! - `common`: Shared test utilities and helpers
//! - `integration`: Sessions, matchmaking and the TCP server working together

pub mod common;
pub mod integration;
