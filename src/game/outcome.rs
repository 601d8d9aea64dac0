use crate::chess::Color;
use std::fmt;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndReason {
    /// The loser's clock reached zero.
    Timeout,
    /// The loser's connection failed or closed.
    Disconnect,
    /// The loser sent `resign`.
    Resign,
    /// A move application reported a winner.
    Board,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            EndReason::Timeout => "timeout",
            EndReason::Disconnect => "disconnect",
            EndReason::Resign => "resign",
            EndReason::Board => "board",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Color,
    pub reason: EndReason,
}

impl GameOutcome {
    /// Outcome where `loser` forfeits for `reason`
    pub fn against(loser: Color, reason: EndReason) -> Self {
        Self {
            winner: loser.opposite(),
            reason,
        }
    }

    pub fn loser(&self) -> Color {
        self.winner.opposite()
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wins by {}", self.winner, self.reason)
    }
}
