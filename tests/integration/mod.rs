//! Integration tests that run the session engine end to end.

// Move protocol as seen through a live session
pub mod session_scenarios;

// Terminal conditions and teardown
pub mod session_lifecycle;
