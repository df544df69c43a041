use log::trace;

use crate::board::BoardError;
use crate::move_gen::leaping_pieces::CastleSide;
use crate::piece::{PieceId, PieceKind};
use crate::position::{Move, Position};

use super::{Match, MatchError, PlayedMove, SpecialMove};

impl Match {
    fn lift(&mut self, position: Position) -> Option<PieceId> {
        let id = self.board.remove(position)?;
        self.pieces[id.index()].set_position(None);
        Some(id)
    }

    fn put(&mut self, id: PieceId, position: Position) -> Result<(), BoardError> {
        self.board.place(&mut self.pieces[id.index()], position)
    }

    /// Moves the piece at `src` to `dest` without any legality checks, taking
    /// whatever stands on `dest`. A king stepping two columns also brings its
    /// rook over, and a pawn stepping diagonally onto an empty square takes the
    /// enemy pawn beside it.
    pub fn execute_move(&mut self, src: Position, dest: Position) -> Result<PlayedMove, MatchError> {
        if !self.board.is_valid_position(dest) {
            return Err(BoardError::OutOfBounds(dest).into());
        }
        let id = self.board.piece_at(src).ok_or(BoardError::NoPiece(src))?;
        let color = self.piece(id).color();

        self.lift(src);
        let mut captured = self.lift(dest);
        self.put(id, dest)?;
        self.pieces[id.index()].increment_move_count();

        let mut special = SpecialMove::Normal;
        match self.piece(id).kind() {
            PieceKind::King => {
                let castle = CastleSide::from_king_move(src, dest)
                    .and_then(|side| side.rook_squares(src));
                if let Some((rook_src, rook_dest)) = castle {
                    let rook = self.board.piece_at(rook_src).filter(|&rook| {
                        let rook = self.piece(rook);
                        rook.kind() == PieceKind::Rook && rook.color() == color
                    });
                    if let Some(rook) = rook {
                        if !self.board.is_occupied(rook_dest) {
                            self.lift(rook_src);
                            self.put(rook, rook_dest)?;
                            self.pieces[rook.index()].increment_move_count();
                            special = SpecialMove::Castle {
                                rook,
                                rook_src,
                                rook_dest,
                            };
                        }
                    }
                }
            }
            PieceKind::Pawn if captured.is_none() && src.column() != dest.column() => {
                let captured_at = Position::new(src.row(), dest.column());
                let victim = self.board.piece_at(captured_at).filter(|&victim| {
                    let victim = self.piece(victim);
                    victim.kind() == PieceKind::Pawn && victim.color() != color
                });
                if let Some(victim) = victim {
                    self.lift(captured_at);
                    captured = Some(victim);
                    special = SpecialMove::EnPassant { captured_at };
                }
            }
            _ => {}
        }

        if let Some(captured) = captured {
            self.captured.push(captured);
        }

        let played = PlayedMove {
            mve: Move::new(src, dest),
            piece: id,
            captured,
            special,
            promotion: None,
        };
        trace!("executed {:?}", played);
        Ok(played)
    }

    /// Exact inverse of `execute_move` for the move it returned, including a
    /// promotion recorded on it.
    pub fn undo_move(&mut self, played: &PlayedMove) -> Result<(), MatchError> {
        let Move { src, dest } = played.mve;

        let id = self.lift(dest).ok_or(BoardError::NoPiece(dest))?;
        debug_assert_eq!(id, played.piece);
        self.put(id, src)?;

        let piece = &mut self.pieces[id.index()];
        piece.decrement_move_count();
        if played.promotion.is_some() {
            piece.set_kind(PieceKind::Pawn);
        }

        if let SpecialMove::Castle {
            rook,
            rook_src,
            rook_dest,
        } = played.special
        {
            let lifted = self.lift(rook_dest).ok_or(BoardError::NoPiece(rook_dest))?;
            debug_assert_eq!(lifted, rook);
            self.put(rook, rook_src)?;
            self.pieces[rook.index()].decrement_move_count();
        }

        if let Some(captured) = played.captured {
            self.captured.retain(|&id| id != captured);
            let at = match played.special {
                SpecialMove::EnPassant { captured_at } => captured_at,
                _ => dest,
            };
            self.put(captured, at)?;
        }

        trace!("undid {:?}", played.mve);
        Ok(())
    }
}
