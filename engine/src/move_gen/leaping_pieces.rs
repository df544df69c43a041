use arrayvec::ArrayVec;

use crate::bitboard::BitBoard;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

use super::{attacked_squares, MoveContext};

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CastleSide {
    King,
    Queen,
}

impl CastleSide {
    fn direction(self) -> i8 {
        match self {
            CastleSide::King => 1,
            CastleSide::Queen => -1,
        }
    }

    fn rook_distance(self) -> i8 {
        match self {
            CastleSide::King => 3,
            CastleSide::Queen => 4,
        }
    }

    /// The side castled on, if a king going `src -> dest` is a castle.
    pub(crate) fn from_king_move(src: Position, dest: Position) -> Option<CastleSide> {
        if src.row() != dest.row() {
            return None;
        }
        match src.column_diff(dest) {
            2 => Some(CastleSide::King),
            -2 => Some(CastleSide::Queen),
            _ => None,
        }
    }

    /// Rook corner and rook destination for a king castling from `king_src`.
    pub(crate) fn rook_squares(self, king_src: Position) -> Option<(Position, Position)> {
        let dir = self.direction();
        Some((
            king_src.offset(0, dir * self.rook_distance())?,
            king_src.offset(0, dir)?,
        ))
    }
}

fn targets(from: Position, offsets: &[(i8, i8)], ctx: &MoveContext) -> ArrayVec<Position, 8> {
    offsets
        .iter()
        .filter_map(|&(d_row, d_column)| ctx.on_board(from.offset(d_row, d_column)))
        .collect()
}

fn landing_squares(color: Color, targets: ArrayVec<Position, 8>, ctx: &MoveContext) -> BitBoard {
    targets
        .into_iter()
        .filter(|&pos| ctx.can_land(color, pos))
        .fold(BitBoard::empty(), |mut moves, pos| {
            moves.set(pos);
            moves
        })
}

pub(super) fn king_moves(color: Color, from: Position, ctx: &MoveContext) -> BitBoard {
    landing_squares(color, targets(from, &KING_OFFSETS, ctx), ctx)
}

pub(super) fn knight_moves(color: Color, from: Position, ctx: &MoveContext) -> BitBoard {
    landing_squares(color, targets(from, &KNIGHT_OFFSETS, ctx), ctx)
}

/// Castle destinations of an unmoved king that is not in check. Each side is
/// decided on its own.
pub(super) fn castling_moves(king: &Piece, from: Position, ctx: &MoveContext) -> BitBoard {
    let mut moves = BitBoard::empty();
    if king.move_count() != 0 || ctx.in_check {
        return moves;
    }

    for side in [CastleSide::King, CastleSide::Queen] {
        if let Some(dest) = castle_destination(king, from, side, ctx) {
            moves.set(dest);
        }
    }
    moves
}

fn castle_destination(
    king: &Piece,
    from: Position,
    side: CastleSide,
    ctx: &MoveContext,
) -> Option<Position> {
    let (rook_src, crossing) = side.rook_squares(from)?;
    let rook = ctx.piece_at(rook_src)?;
    if rook.kind() != PieceKind::Rook || rook.color() != king.color() || rook.move_count() != 0 {
        return None;
    }

    let dir = side.direction();
    let path_clear = (1..side.rook_distance()).all(|step| {
        from.offset(0, dir * step)
            .is_some_and(|pos| !ctx.board.is_occupied(pos))
    });
    if !path_clear {
        return None;
    }

    let dest = ctx.on_board(from.offset(0, 2 * dir))?;
    if ctx.rules.strict_castling
        && attacked_squares(ctx, king.color().opposite()).is_set(crossing)
    {
        return None;
    }
    Some(dest)
}
