use crate::chess::{Board, Color, Move, Position, ProtocolFormatError};
use crate::game::EndReason;
use std::fmt;

pub const NEED_STATE: &str = "needState";
pub const RESIGN: &str = "resign";

/// Longest possible `state` message: widest sequence number and 64 of the
/// widest square triple.
pub const MAX_STATE_SNAPSHOT_LEN: usize =
    "state ".len() + "-9223372036854775808 ".len() + 64 * "(false, White, Bishop) ".len();

/// A text message sent by a player to its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    NeedState,
    Resign,
    Move(Move),
}

impl Inbound {
    pub fn parse(text: &str) -> Result<Self, ProtocolFormatError> {
        match text.trim() {
            NEED_STATE => Ok(Inbound::NeedState),
            RESIGN => Ok(Inbound::Resign),
            other => Move::parse(other).map(Inbound::Move),
        }
    }
}

/// Notifications a session pushes to its players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Start(Color),
    State { sequence_number: i64, board: Board },
    OtherMove { source: Position, dest: Position },
    MoveAck { source: Position, dest: Position },
    InvalidMoveFormat,
    NotYourTurn,
    GameOver { winner: Color, reason: EndReason },
}

impl Outbound {
    pub fn message_type(&self) -> &'static str {
        match self {
            Outbound::Start(_) => "start",
            Outbound::State { .. } => "state",
            Outbound::OtherMove { .. } => "othermove",
            Outbound::MoveAck { .. } => "moveack",
            Outbound::InvalidMoveFormat => "invalid move fmt",
            Outbound::NotYourTurn => "notYourTurn",
            Outbound::GameOver { .. } => "gameover",
        }
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outbound::Start(color) => write!(f, "Start{}", color),
            Outbound::State {
                sequence_number,
                board,
            } => {
                // Every triple carries its own trailing space, matching deployed clients
                write!(f, "state {} ", sequence_number)?;
                for (_, square) in board.iter() {
                    write!(
                        f,
                        "({}, {}, {}) ",
                        square.has_moved, square.side, square.piece
                    )?;
                }
                Ok(())
            }
            Outbound::OtherMove { source, dest } => write!(f, "othermove {} {}", source, dest),
            Outbound::MoveAck { source, dest } => write!(f, "moveack {} {}", source, dest),
            Outbound::InvalidMoveFormat => f.write_str("invalid move fmt"),
            Outbound::NotYourTurn => f.write_str("notYourTurn"),
            Outbound::GameOver { winner, reason } => write!(f, "gameover {} {}", winner, reason),
        }
    }
}
