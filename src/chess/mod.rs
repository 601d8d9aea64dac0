// Re-export all public items
pub use self::board::{Board, Square};
pub use self::error::{MoveRejection, ProtocolFormatError};
pub use self::moves::{Move, MoveOutcome};
pub use self::piece::{Color, PieceKind, Side};
pub use self::position::Position;

// Define submodules
mod board;
mod error;
mod moves;
mod piece;
mod position;
