pub mod chess;
pub mod cli;
pub mod game;
pub mod messages;
pub mod network;

// Re-export key types for easy testing
pub use chess::{Board, Color, Move, MoveRejection, ProtocolFormatError};
pub use game::{ChannelPlayer, GameOutcome, Matchmaker, MatchmakerHandle, Player, Session};
pub use network::{NetworkPlayer, Server};
