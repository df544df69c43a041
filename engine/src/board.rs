use crate::bitboard::STRIDE;
use crate::piece::{Piece, PieceId};
use crate::position::Position;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions: want 1..=8 x 1..=8, got {0} x {1}")]
    Dimensions(u8, u8),

    #[error("position {0} is off the board")]
    OutOfBounds(Position),

    #[error("there is already a piece at {0}")]
    Occupied(Position),

    #[error("no piece at {0}")]
    NoPiece(Position),
}

/// Grid of cells, each holding at most one piece. Knows nothing about rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: u8,
    columns: u8,
    cells: Vec<Option<PieceId>>,
}

impl Board {
    pub fn new(rows: u8, columns: u8) -> Result<Self, BoardError> {
        if !(1..=STRIDE).contains(&rows) || !(1..=STRIDE).contains(&columns) {
            return Err(BoardError::Dimensions(rows, columns));
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![None; rows as usize * columns as usize],
        })
    }

    pub fn standard() -> Self {
        Self {
            rows: 8,
            columns: 8,
            cells: vec![None; 64],
        }
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn is_valid_position(&self, position: Position) -> bool {
        position.row() < self.rows && position.column() < self.columns
    }

    pub fn piece_at(&self, position: Position) -> Option<PieceId> {
        if self.is_valid_position(position) {
            self.cells[self.cell_index(position)]
        } else {
            None
        }
    }

    pub fn is_occupied(&self, position: Position) -> bool {
        self.piece_at(position).is_some()
    }

    /// Puts `piece` on `position` and records the position on the piece.
    pub fn place(&mut self, piece: &mut Piece, position: Position) -> Result<(), BoardError> {
        if !self.is_valid_position(position) {
            return Err(BoardError::OutOfBounds(position));
        }
        let idx = self.cell_index(position);
        if self.cells[idx].is_some() {
            return Err(BoardError::Occupied(position));
        }
        self.cells[idx] = Some(piece.id());
        piece.set_position(Some(position));
        Ok(())
    }

    /// Clears the cell, returning whatever was on it.
    pub fn remove(&mut self, position: Position) -> Option<PieceId> {
        if !self.is_valid_position(position) {
            return None;
        }
        let idx = self.cell_index(position);
        self.cells[idx].take()
    }

    /// Every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |col| Position::new(row, col)))
    }

    fn cell_index(&self, position: Position) -> usize {
        position.row() as usize * self.columns as usize + position.column() as usize
    }
}
