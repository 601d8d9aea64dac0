use std::fmt;

/// A board coordinate. Rank 0 is Black's back rank, rank 7 is White's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub rank: u8,
    pub file: u8,
}

impl Position {
    /// Both axes must already be in 0..8; the move parser and board iteration guarantee it.
    pub const fn new(rank: u8, file: u8) -> Self {
        Self { rank, file }
    }

    /// All squares in row-major order, rank 0 file 0 first.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..8).flat_map(|rank| (0..8).map(move |file| Position { rank, file }))
    }
}

// Wire order: "<rank> <file>"
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rank, self.file)
    }
}
