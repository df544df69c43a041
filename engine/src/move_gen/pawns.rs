use crate::bitboard::BitBoard;
use crate::piece::{Color, Piece, PieceKind};
use crate::position::Position;

use super::MoveContext;

fn start_row(color: Color, ctx: &MoveContext) -> u8 {
    match color {
        Color::White => ctx.board.rows().saturating_sub(2),
        Color::Black => 1,
    }
}

pub(super) fn pawn_moves(pawn: &Piece, from: Position, ctx: &MoveContext) -> BitBoard {
    let color = pawn.color();
    let forward = color.forward();
    let mut moves = BitBoard::empty();

    if let Some(one) = ctx.on_board(from.offset(forward, 0)) {
        if !ctx.board.is_occupied(one) {
            moves.set(one);

            if from.row() == start_row(color, ctx) {
                if let Some(two) = ctx.on_board(from.offset(2 * forward, 0)) {
                    if !ctx.board.is_occupied(two) {
                        moves.set(two);
                    }
                }
            }
        }
    }

    for target in pawn_attacks(color, from, ctx) {
        if ctx
            .piece_at(target)
            .is_some_and(|occupant| occupant.color() != color)
        {
            moves.set(target);
        }
    }

    if let Some(dest) = en_passant_destination(pawn, from, ctx) {
        moves.set(dest);
    }

    moves
}

pub(super) fn pawn_attacks(color: Color, from: Position, ctx: &MoveContext) -> BitBoard {
    let forward = color.forward();
    [-1, 1]
        .into_iter()
        .filter_map(|d_column| ctx.on_board(from.offset(forward, d_column)))
        .fold(BitBoard::empty(), |mut attacks, pos| {
            attacks.set(pos);
            attacks
        })
}

/// Capture square against the vulnerable pawn: it must be an enemy pawn
/// standing right beside `from`.
fn en_passant_destination(pawn: &Piece, from: Position, ctx: &MoveContext) -> Option<Position> {
    let vulnerable = ctx.piece(ctx.en_passant_vulnerable?);
    let at = vulnerable.position()?;

    if vulnerable.kind() != PieceKind::Pawn
        || vulnerable.color() == pawn.color()
        || at.row() != from.row()
        || from.column().abs_diff(at.column()) != 1
    {
        return None;
    }

    let d_column = from.column_diff(at) as i8;
    let dest = ctx.on_board(from.offset(pawn.color().forward(), d_column))?;
    if ctx.board.is_occupied(dest) {
        return None;
    }
    Some(dest)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::Layout;
    use super::super::MoveContext;
    use crate::bitboard::BitBoard;
    use crate::piece::{Color, PieceKind};
    use crate::position::Position;
    use test_case::test_case;

    #[test_case(Color::White, 6, 4, &[(5, 4), (4, 4)] ; "white double")]
    #[test_case(Color::White, 5, 4, &[(4, 4)] ; "white single")]
    #[test_case(Color::Black, 1, 2, &[(2, 2), (3, 2)] ; "black double")]
    #[test_case(Color::Black, 6, 2, &[(7, 2)] ; "black single edge")]
    #[test_case(Color::White, 0, 2, &[] ; "white last row")]
    fn test_pushes(color: Color, row: u8, column: u8, want: &[(u8, u8)]) {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, color, row, column);
        let ctx = layout.ctx();

        let want: Vec<Position> = want.iter().map(|&(r, c)| Position::new(r, c)).collect();
        assert_eq!(
            ctx.piece(pawn).possible_moves(&ctx),
            BitBoard::from_positions(&want)
        );
    }

    #[test]
    fn test_double_push_blocked() {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, Color::White, 6, 4);
        layout.put(PieceKind::Knight, Color::Black, 5, 4);
        let ctx = layout.ctx();

        assert!(ctx.piece(pawn).possible_moves(&ctx).is_empty());
    }

    #[test]
    fn test_diagonal_capture_only_enemy() {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, Color::White, 4, 4);
        layout.put(PieceKind::Knight, Color::Black, 3, 3);
        layout.put(PieceKind::Knight, Color::White, 3, 5);
        let ctx = layout.ctx();

        assert_eq!(
            ctx.piece(pawn).possible_moves(&ctx),
            BitBoard::from_positions(&[Position::new(3, 4), Position::new(3, 3)])
        );
    }

    #[test]
    fn test_en_passant() {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, Color::White, 3, 4);
        let vulnerable = layout.put(PieceKind::Pawn, Color::Black, 3, 3);
        let ctx = MoveContext {
            en_passant_vulnerable: Some(vulnerable),
            ..layout.ctx()
        };

        assert_eq!(
            ctx.piece(pawn).possible_moves(&ctx),
            BitBoard::from_positions(&[Position::new(2, 4), Position::new(2, 3)])
        );
    }

    #[test_case(Color::White, 3, 3 ; "own pawn")]
    #[test_case(Color::Black, 3, 2 ; "not adjacent")]
    #[test_case(Color::Black, 4, 3 ; "different row")]
    fn test_no_en_passant(color: Color, row: u8, column: u8) {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, Color::White, 3, 4);
        let other = layout.put(PieceKind::Pawn, color, row, column);
        let ctx = MoveContext {
            en_passant_vulnerable: Some(other),
            ..layout.ctx()
        };

        assert!(!ctx.piece(pawn).possible_moves(&ctx).is_set(Position::new(2, 3)));
    }

    #[test]
    fn test_attacks_ignore_occupancy() {
        let mut layout = Layout::new();
        let pawn = layout.put(PieceKind::Pawn, Color::White, 6, 0);
        let ctx = layout.ctx();

        assert_eq!(
            ctx.piece(pawn).attacks(&ctx),
            BitBoard::from_positions(&[Position::new(5, 1)])
        );
    }
}
