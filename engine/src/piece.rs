use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use crate::position::Position;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PieceError {
    #[error("char -> piece: got {0}")]
    FromChar(char),
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a pawn step. White starts at the bottom of the board.
    pub(crate) fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

#[derive(Debug, PartialEq, Eq, EnumIter, Clone, Copy, Display, Hash, Deserialize, Serialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<PieceKind> for char {
    fn from(kind: PieceKind) -> char {
        match kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

impl TryFrom<char> for PieceKind {
    type Error = PieceError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'p' => Ok(PieceKind::Pawn),
            'n' => Ok(PieceKind::Knight),
            'b' => Ok(PieceKind::Bishop),
            'r' => Ok(PieceKind::Rook),
            'q' => Ok(PieceKind::Queen),
            'k' => Ok(PieceKind::King),
            _ => Err(PieceError::FromChar(value)),
        }
    }
}

/// Index of a piece in the arena owned by its match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct PieceId(pub(crate) usize);

impl PieceId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Piece {
    id: PieceId,
    kind: PieceKind,
    color: Color,
    position: Option<Position>,
    move_count: u32,
}

impl Piece {
    pub(crate) fn new(id: PieceId, kind: PieceKind, color: Color) -> Self {
        Self {
            id,
            kind,
            color,
            position: None,
            move_count: 0,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Current cell, `None` once the piece has been captured.
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn is_in_play(&self) -> bool {
        self.position.is_some()
    }

    /// Board symbol: uppercase for White, lowercase for Black.
    pub fn symbol(&self) -> char {
        let ch: char = self.kind.into();
        match self.color {
            Color::White => ch.to_ascii_uppercase(),
            Color::Black => ch,
        }
    }

    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    pub(crate) fn increment_move_count(&mut self) {
        self.move_count += 1;
    }

    pub(crate) fn decrement_move_count(&mut self) {
        debug_assert!(self.move_count > 0, "move count would underflow for {:?}", self);
        self.move_count = self.move_count.saturating_sub(1);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PieceKind::King, Color::White, 'K')]
    #[test_case(PieceKind::Knight, Color::Black, 'n')]
    #[test_case(PieceKind::Pawn, Color::White, 'P')]
    fn test_symbol(kind: PieceKind, color: Color, want: char) {
        let piece = Piece::new(PieceId(0), kind, color);
        assert_eq!(piece.symbol(), want);
        assert_eq!(piece.to_string(), want.to_string());
    }

    #[test_case('Q', PieceKind::Queen)]
    #[test_case('r', PieceKind::Rook)]
    fn test_kind_from_char(ch: char, want: PieceKind) {
        assert_eq!(PieceKind::try_from(ch), Ok(want));
    }

    #[test]
    fn test_kind_from_char_err() {
        assert_eq!(PieceKind::try_from('x'), Err(PieceError::FromChar('x')));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Color::White.opposite(), Color::Black);
        assert_eq!(Color::Black.opposite(), Color::White);
    }
}
