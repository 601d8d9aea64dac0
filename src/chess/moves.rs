use super::board::Board;
use super::error::{MoveRejection, ProtocolFormatError};
use super::piece::{Color, Side};
use super::position::Position;
use std::fmt;

const FIELDS: [&str; 5] = ["seq", "src_rank", "src_file", "dest_rank", "dest_file"];

/// A client-submitted move intent, not yet validated against a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub source: Position,
    pub dest: Position,
    pub sequence_number: i64,
}

/// Result of applying a move that the board accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    /// Terminal result decided by this move. No rule currently produces one.
    pub winner: Option<Color>,
}

impl Move {
    pub fn new(sequence_number: i64, source: Position, dest: Position) -> Self {
        Self {
            source,
            dest,
            sequence_number,
        }
    }

    /// Parse `seq src_rank src_file dest_rank dest_file`
    pub fn parse(text: &str) -> Result<Self, ProtocolFormatError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() != FIELDS.len() {
            return Err(ProtocolFormatError::TokenCount {
                count: tokens.len(),
            });
        }

        let mut values = [0i64; 5];
        for (position, token) in tokens.iter().enumerate() {
            values[position] =
                token
                    .parse::<i64>()
                    .map_err(|_| ProtocolFormatError::NotAnInteger {
                        position,
                        field: FIELDS[position],
                        token: token.to_string(),
                    })?;
        }

        let source = coordinate(&values, 1)?;
        let dest = coordinate(&values, 3)?;

        Ok(Self::new(values[0], source, dest))
    }

    /// Validate this move for `mover` and, if accepted, relocate the piece.
    ///
    /// Checks run in order: sequence, ownership, empty source. The board is
    /// untouched on rejection. No further legality is enforced.
    pub fn apply(
        &self,
        board: &mut Board,
        mover: Color,
        current_sequence: i64,
    ) -> Result<MoveOutcome, MoveRejection> {
        let expected = current_sequence + 1;
        if self.sequence_number != expected {
            return Err(MoveRejection::SequenceMismatch {
                expected,
                got: self.sequence_number,
            });
        }

        let source = board.square(self.source);
        let mover_side = Side::from(mover);
        // An empty square has no owner and falls through to the empty check
        if source.side != Side::None && source.side != mover_side {
            return Err(MoveRejection::Ownership {
                mover: mover_side,
                owner: source.side,
                square: self.source,
            });
        }
        if source.is_empty() {
            return Err(MoveRejection::EmptySquare {
                square: self.source,
            });
        }

        board.relocate(self.source, self.dest);
        Ok(MoveOutcome::default())
    }
}

fn coordinate(values: &[i64; 5], first: usize) -> Result<Position, ProtocolFormatError> {
    let axis = |position: usize| -> Result<u8, ProtocolFormatError> {
        let value = values[position];
        if (0..8).contains(&value) {
            Ok(value as u8)
        } else {
            Err(ProtocolFormatError::OffBoard {
                position,
                field: FIELDS[position],
                value,
            })
        }
    };
    Ok(Position::new(axis(first)?, axis(first + 1)?))
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.sequence_number, self.source, self.dest)
    }
}
