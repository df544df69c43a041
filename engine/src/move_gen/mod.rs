pub(crate) mod leaping_pieces;
mod pawns;
mod sliding_pieces;

use crate::bitboard::BitBoard;
use crate::board::Board;
use crate::piece::{Color, Piece, PieceId, PieceKind};
use crate::position::Position;
use crate::rules::Rules;

use self::sliding_pieces::{BISHOP_DIRS, QUEEN_DIRS, ROOK_DIRS};

/// Read-only view handed to move generation: occupancy plus the bits of
/// match state that castling and en passant depend on.
#[derive(Clone, Copy, Debug)]
pub struct MoveContext<'a> {
    pub board: &'a Board,
    pub pieces: &'a [Piece],
    /// Whether the side being generated for is currently in check.
    pub in_check: bool,
    pub en_passant_vulnerable: Option<PieceId>,
    pub rules: Rules,
}

impl<'a> MoveContext<'a> {
    pub fn piece(&self, id: PieceId) -> &'a Piece {
        &self.pieces[id.index()]
    }

    pub fn piece_at(&self, position: Position) -> Option<&'a Piece> {
        self.board.piece_at(position).map(|id| self.piece(id))
    }

    /// On the board and either empty or held by the other side.
    fn can_land(&self, color: Color, position: Position) -> bool {
        self.board.is_valid_position(position)
            && self
                .piece_at(position)
                .map_or(true, |occupant| occupant.color() != color)
    }

    fn on_board(&self, position: Option<Position>) -> Option<Position> {
        position.filter(|&pos| self.board.is_valid_position(pos))
    }
}

impl Piece {
    /// Pseudo-legal destinations: movement pattern and occupancy only, no
    /// self-check filtering.
    pub fn possible_moves(&self, ctx: &MoveContext) -> BitBoard {
        let Some(from) = self.position() else {
            return BitBoard::empty();
        };

        match self.kind() {
            PieceKind::King => {
                leaping_pieces::king_moves(self.color(), from, ctx)
                    | leaping_pieces::castling_moves(self, from, ctx)
            }
            PieceKind::Queen => sliding_pieces::gen_moves(&QUEEN_DIRS, self.color(), from, ctx),
            PieceKind::Rook => sliding_pieces::gen_moves(&ROOK_DIRS, self.color(), from, ctx),
            PieceKind::Bishop => sliding_pieces::gen_moves(&BISHOP_DIRS, self.color(), from, ctx),
            PieceKind::Knight => leaping_pieces::knight_moves(self.color(), from, ctx),
            PieceKind::Pawn => pawns::pawn_moves(self, from, ctx),
        }
    }

    /// Squares this piece threatens. Differs from `possible_moves` for pawns
    /// (diagonals whether or not anything stands there) and kings (no
    /// castling).
    pub fn attacks(&self, ctx: &MoveContext) -> BitBoard {
        let Some(from) = self.position() else {
            return BitBoard::empty();
        };

        match self.kind() {
            PieceKind::Pawn => pawns::pawn_attacks(self.color(), from, ctx),
            PieceKind::King => leaping_pieces::king_moves(self.color(), from, ctx),
            _ => self.possible_moves(ctx),
        }
    }

    pub fn can_move_to(&self, dest: Position, ctx: &MoveContext) -> bool {
        ctx.board.is_valid_position(dest) && self.possible_moves(ctx).is_set(dest)
    }

    pub fn has_possible_moves(&self, ctx: &MoveContext) -> bool {
        !self.possible_moves(ctx).is_empty()
    }
}

/// Union of the attacks of every piece of `color` still on the board.
pub fn attacked_squares(ctx: &MoveContext, color: Color) -> BitBoard {
    ctx.pieces
        .iter()
        .filter(|piece| piece.color() == color && piece.is_in_play())
        .fold(BitBoard::empty(), |acc, piece| acc | piece.attacks(ctx))
}
