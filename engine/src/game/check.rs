use crate::move_gen::attacked_squares;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Move;

use super::{Match, MatchError};

impl Match {
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces.iter().find(|piece| {
            piece.kind() == PieceKind::King && piece.color() == color && piece.is_in_play()
        })
    }

    /// Whether any piece of the other side attacks the king of `color`.
    /// A missing king is an error, never "not in check".
    pub fn is_in_check(&self, color: Color) -> Result<bool, MatchError> {
        let king_pos = self
            .king(color)
            .and_then(Piece::position)
            .ok_or(MatchError::NoKing(color))?;

        let ctx = self.context(false);
        Ok(attacked_squares(&ctx, color.opposite()).is_set(king_pos))
    }

    /// True when `color` is in check and every one of its pseudo-legal moves
    /// still leaves it in check. Each candidate is tried and undone, so the
    /// match is unchanged afterwards.
    pub fn is_checkmate(&mut self, color: Color) -> Result<bool, MatchError> {
        if !self.is_in_check(color)? {
            return Ok(false);
        }

        for mve in self.pseudo_legal_moves(color, true) {
            if !self.leaves_in_check(color, mve)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    pub(super) fn leaves_in_check(&mut self, color: Color, mve: Move) -> Result<bool, MatchError> {
        let played = self.execute_move(mve.src, mve.dest)?;
        let in_check = self.is_in_check(color);
        self.undo_move(&played)?;
        in_check
    }
}
