use std::fmt;
use std::ops::BitOr;

use crate::position::Position;

/// Row stride of the bitmap. Boards are at most 8x8, so every cell of every
/// supported board has its own bit.
pub(crate) const STRIDE: u8 = 8;

/// Legality bitmap: one bit per board cell, bit `row * 8 + column`.
#[derive(PartialEq, Eq, Clone, Copy, Default, Hash)]
pub struct BitBoard(u64);

impl BitBoard {
    pub const fn empty() -> Self {
        BitBoard(0)
    }

    pub fn from_positions(positions: &[Position]) -> Self {
        BitBoard(
            positions
                .iter()
                .fold(0, |board, &pos| board | 1 << bit_index(pos)),
        )
    }

    pub fn set(&mut self, position: Position) {
        self.0 |= 1 << bit_index(position)
    }

    pub fn is_set(&self, position: Position) -> bool {
        self.0 & 1 << bit_index(position) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub(crate) fn pop_lsb(&mut self) -> Position {
        debug_assert!(self.0 != 0, "want != 0, got 0");
        let idx = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Position::new(idx / STRIDE, idx % STRIDE)
    }

    /// Marked cells in row-major order.
    pub fn positions(self) -> Vec<Position> {
        self.into_iter().collect()
    }
}

fn bit_index(position: Position) -> u8 {
    debug_assert!(
        position.row() < STRIDE && position.column() < STRIDE,
        "position {} does not fit a bitboard",
        position
    );
    position.row() * STRIDE + position.column()
}

pub struct BitBoardIter(BitBoard);

impl Iterator for BitBoardIter {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.pop_lsb())
        }
    }
}

impl IntoIterator for BitBoard {
    type Item = Position;
    type IntoIter = BitBoardIter;

    fn into_iter(self) -> Self::IntoIter {
        BitBoardIter(self)
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;

    fn bitor(self, other: BitBoard) -> BitBoard {
        BitBoard(self.0 | other.0)
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut board_str = String::with_capacity(64 + 7);

        for row in 0..STRIDE {
            for column in 0..STRIDE {
                let ch = if self.is_set(Position::new(row, column)) {
                    'X'
                } else {
                    '.'
                };
                board_str.push(ch);
            }
            if row != STRIDE - 1 {
                board_str.push('\n');
            }
        }

        write!(f, "{}", board_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_bitboard_from_positions() {
        let got = BitBoard::from_positions(&[
            Position::new(0, 0),
            Position::new(1, 0),
            Position::new(4, 4),
        ]);
        let want = BitBoard(0b0000000000000000000000000001000000000000000000000000000100000001);
        assert_eq!(got, want);
    }

    #[test]
    fn test_debug() {
        let got = BitBoard::from_positions(&[
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(2, 2),
            Position::new(3, 3),
            Position::new(4, 4),
            Position::new(5, 5),
            Position::new(6, 6),
            Position::new(7, 7),
        ]);
        let want = "X.......\n.X......\n..X.....\n...X....\n....X...\n.....X..\n......X.\n.......X";
        assert_eq!(format!("{:?}", got), want);
    }

    #[test]
    fn test_set() {
        let pos = Position::new(3, 5);
        let mut bb = BitBoard::empty();
        assert!(!bb.is_set(pos));

        bb.set(pos);
        assert!(bb.is_set(pos));
        assert_eq!(bb.count(), 1);
        assert!(!bb.is_empty());

        bb.set(pos);
        assert_eq!(bb.count(), 1);
    }

    #[test_case(BitBoard(0b1001000), Position::new(0, 3), BitBoard(0b1000000) ; "first row")]
    #[test_case(BitBoard(0b1000000), Position::new(0, 6), BitBoard(0b0000000) ; "last bit")]
    #[test_case(BitBoard(1 << 63), Position::new(7, 7), BitBoard(0) ; "corner")]
    fn test_pop_lsb(mut inp: BitBoard, lsb_want: Position, res_want: BitBoard) {
        let lsb_got = inp.pop_lsb();
        assert_eq!(lsb_got, lsb_want);
        assert_eq!(inp, res_want);
    }

    #[test]
    fn test_positions_row_major() {
        let bb = BitBoard::from_positions(&[
            Position::new(6, 1),
            Position::new(0, 7),
            Position::new(6, 0),
        ]);
        assert_eq!(
            bb.positions(),
            vec![
                Position::new(0, 7),
                Position::new(6, 0),
                Position::new(6, 1)
            ]
        );
    }
}
