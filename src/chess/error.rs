use super::piece::Side;
use super::position::Position;
use thiserror::Error;

/// Malformed move text. `position` is the zero-based token index that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolFormatError {
    #[error("expected 5 tokens `seq src_rank src_file dest_rank dest_file`, got {count}")]
    TokenCount { count: usize },

    #[error("token {position} ({field}) is not an integer: '{token}'")]
    NotAnInteger {
        position: usize,
        field: &'static str,
        token: String,
    },

    #[error("token {position} ({field}) is off the board: {value}")]
    OffBoard {
        position: usize,
        field: &'static str,
        value: i64,
    },
}

impl ProtocolFormatError {
    /// Token index the parser stopped at.
    pub fn position(&self) -> Option<usize> {
        match self {
            ProtocolFormatError::TokenCount { .. } => None,
            ProtocolFormatError::NotAnInteger { position, .. }
            | ProtocolFormatError::OffBoard { position, .. } => Some(*position),
        }
    }
}

/// A well-formed move that the board refused. Recoverable; the mover gets a state resend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("sequence number {got} is out of order, expected {expected}")]
    SequenceMismatch { expected: i64, got: i64 },

    #[error("{mover} cannot move the piece on {square}, it belongs to {owner}")]
    Ownership {
        mover: Side,
        owner: Side,
        square: Position,
    },

    #[error("source square {square} is empty")]
    EmptySquare { square: Position },
}
