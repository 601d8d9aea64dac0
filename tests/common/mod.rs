//! Common test utilities and helper modules

pub mod test_helpers;
