pub mod types;
pub mod wire;

pub use types::{Inbound, Outbound, MAX_STATE_SNAPSHOT_LEN, NEED_STATE, RESIGN};
pub use wire::{
    FramedText, WireConfig, WireProtocolError, DEFAULT_HANDSHAKE_TIMEOUT,
    DEFAULT_MAX_MESSAGE_SIZE, DEFAULT_WRITE_TIMEOUT, LENGTH_PREFIX_SIZE, MIN_MESSAGE_SIZE,
};
