use super::piece::{PieceKind, Side};
use super::position::Position;

/// Contents of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Square {
    pub piece: PieceKind,
    pub side: Side,
    pub has_moved: bool,
}

impl Square {
    pub const EMPTY: Square = Square {
        piece: PieceKind::Empty,
        side: Side::None,
        has_moved: false,
    };

    pub const fn new(piece: PieceKind, side: Side) -> Self {
        Self {
            piece,
            side,
            has_moved: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.piece.is_empty()
    }
}

/// 8x8 grid, row-major. `squares[rank][file]`, rank 0 = Black's back rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Square; 8]; 8],
}

impl Board {
    /// Create a board with the starting layout
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_starting_position();
        board
    }

    /// Board with every square `{Empty, None, false}`
    pub fn empty() -> Self {
        Self {
            squares: [[Square::EMPTY; 8]; 8],
        }
    }

    pub fn square(&self, pos: Position) -> &Square {
        &self.squares[pos.rank as usize][pos.file as usize]
    }

    pub fn set_square(&mut self, pos: Position, square: Square) {
        self.squares[pos.rank as usize][pos.file as usize] = square;
    }

    /// Iterate over every square in row-major order (rank 0 file 0 first)
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Square)> {
        Position::all().map(move |pos| (pos, self.square(pos)))
    }

    /// Move the occupant of `from` onto `to` unconditionally.
    ///
    /// Whatever stood on `to` is overwritten; `from` becomes empty.
    pub fn relocate(&mut self, from: Position, to: Position) {
        let moving = *self.square(from);
        self.set_square(from, Square::EMPTY);
        self.set_square(
            to,
            Square {
                piece: moving.piece,
                side: moving.side,
                has_moved: true,
            },
        );
    }

    fn setup_starting_position(&mut self) {
        for (file, kind) in PieceKind::BACK_RANK.iter().enumerate() {
            self.squares[0][file] = Square::new(*kind, Side::Black);
            self.squares[1][file] = Square::new(PieceKind::Pawn, Side::Black);
            self.squares[6][file] = Square::new(PieceKind::Pawn, Side::White);
            self.squares[7][file] = Square::new(*kind, Side::White);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
