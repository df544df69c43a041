use crate::bitboard::BitBoard;
use crate::piece::Color;
use crate::position::Position;

use super::MoveContext;

pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub(super) const QUEEN_DIRS: [(i8, i8); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Rays out of `from`, each stopping at the edge or the first occupied
/// square. That square is included only when it holds an enemy.
pub(super) fn gen_moves(
    dirs: &[(i8, i8)],
    color: Color,
    from: Position,
    ctx: &MoveContext,
) -> BitBoard {
    let mut moves = BitBoard::empty();

    for &(d_row, d_column) in dirs {
        let mut curr = from;
        while let Some(next) = ctx.on_board(curr.offset(d_row, d_column)) {
            match ctx.piece_at(next) {
                None => {
                    moves.set(next);
                    curr = next;
                }
                Some(blocker) => {
                    if blocker.color() != color {
                        moves.set(next);
                    }
                    break;
                }
            }
        }
    }
    moves
}
