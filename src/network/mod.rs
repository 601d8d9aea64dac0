pub mod connection;
pub mod server;

pub use connection::{authenticate, generate_player_id, HandshakeError, NetworkPlayer};
pub use server::{Server, ServerSettings, DEFAULT_AUTH_TOKEN};
