use serde::{Deserialize, Serialize};

/// Rule switches for a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Rules {
    /// Also forbid castling across a square attacked by the opponent. When
    /// off, only "not currently in check" is required, plus the usual
    /// self-check test on the landing square.
    pub strict_castling: bool,
    /// Turn a pawn reaching the far row into a queen.
    pub promote_pawns: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            strict_castling: false,
            promote_pawns: true,
        }
    }
}
