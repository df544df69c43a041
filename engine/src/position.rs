use std::fmt;

use serde::{Deserialize, Serialize};

/// Board-relative coordinate. Row 0 is the top of the board (Black's back
/// rank on a standard board), column 0 is the leftmost file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Position {
    row: u8,
    column: u8,
}

impl Position {
    pub const fn new(row: u8, column: u8) -> Self {
        Self { row, column }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn column(self) -> u8 {
        self.column
    }

    /// The position shifted by the given deltas, or `None` if that would
    /// leave the non-negative quadrant. Upper bounds are the board's concern.
    pub fn offset(self, d_row: i8, d_column: i8) -> Option<Position> {
        let row = u8::try_from(self.row as i16 + d_row as i16).ok()?;
        let column = u8::try_from(self.column as i16 + d_column as i16).ok()?;
        Some(Position::new(row, column))
    }

    pub(crate) fn row_diff(self, other: Position) -> i16 {
        other.row as i16 - self.row as i16
    }

    pub(crate) fn column_diff(self, other: Position) -> i16 {
        other.column as i16 - self.column as i16
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Move {
    pub src: Position,
    pub dest: Position,
}

impl Move {
    pub fn new(src: Position, dest: Position) -> Move {
        Self { src, dest }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.src, self.dest)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dest)
    }
}
