use log::debug;
use strum::IntoEnumIterator;

use crate::board::Board;
use crate::piece::{Color, Piece, PieceId, PieceKind};
use crate::position::Position;
use crate::rules::Rules;

use super::{Match, MatchError, MatchState};

const BACK_ROW: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum PlacementError {
    #[error("piece placement: got {0}, err at {1}")]
    PiecePlacement(String, usize),

    #[error("kings: want exactly one {0} king, got {1}")]
    KingCount(Color, usize),

    #[error("the side not to move ({0}) is in check")]
    OpponentInCheck(Color),

    #[error(transparent)]
    Match(#[from] MatchError),
}

impl Match {
    /// Standard starting layout with default rules.
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    pub fn with_rules(rules: Rules) -> Self {
        let mut game = Self::empty(rules);
        let layout = [(Color::White, 7, 6), (Color::Black, 0, 1)];
        for (color, back_row, pawn_row) in layout {
            for (column, kind) in BACK_ROW.into_iter().enumerate() {
                game.spawn(kind, color, Position::new(back_row, column as u8));
            }
            for column in 0..game.board.columns() {
                game.spawn(PieceKind::Pawn, color, Position::new(pawn_row, column));
            }
        }
        game
    }

    /// Standard 8x8 board with no pieces on it, White to move.
    pub fn empty(rules: Rules) -> Self {
        Self {
            board: Board::standard(),
            pieces: Vec::new(),
            captured: Vec::new(),
            state: MatchState::start(),
            rules,
            history: Vec::new(),
        }
    }

    /// Adds a fresh, unmoved piece to the arena and the board.
    pub fn place_new_piece(
        &mut self,
        kind: PieceKind,
        color: Color,
        position: Position,
    ) -> Result<PieceId, MatchError> {
        let id = PieceId(self.pieces.len());
        let mut piece = Piece::new(id, kind, color);
        self.board.place(&mut piece, position)?;
        self.pieces.push(piece);
        Ok(id)
    }

    // Only for squares known to be empty and on the board.
    fn spawn(&mut self, kind: PieceKind, color: Color, position: Position) {
        let id = PieceId(self.pieces.len());
        let mut piece = Piece::new(id, kind, color);
        if self.board.place(&mut piece, position).is_ok() {
            self.pieces.push(piece);
        }
    }

    /// Builds a match from the piece placement field of a FEN string, e.g.
    /// `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR`. The first rank listed is
    /// row 0. Every piece starts unmoved, so castling is available wherever
    /// king and rook stand on their usual squares.
    pub fn from_placement(
        placement: &str,
        to_move: Color,
        rules: Rules,
    ) -> Result<Self, PlacementError> {
        let mut game = Self::empty(rules);
        let columns = game.board.columns();
        let invalid = |idx| PlacementError::PiecePlacement(placement.to_string(), idx);

        let mut row: u8 = 0;
        let mut column: u8 = 0;
        for (ch_idx, ch) in placement.chars().enumerate() {
            if let Ok(kind) = PieceKind::try_from(ch) {
                let color = if ch.is_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                game.place_new_piece(kind, color, Position::new(row, column))
                    .map_err(|_| invalid(ch_idx))?;
                column += 1;
            } else if let Some(digit) = ch.to_digit(10) {
                column += digit as u8;
                if column > columns {
                    Err(invalid(ch_idx))?
                }
            } else if ch == '/' {
                if column != columns || row + 1 >= game.board.rows() {
                    Err(invalid(ch_idx))?
                }
                row += 1;
                column = 0;
            } else {
                Err(invalid(ch_idx))?
            }
        }
        if row + 1 != game.board.rows() || column != columns {
            Err(invalid(placement.len()))?
        }

        for color in Color::iter() {
            let kings = game
                .pieces_in_play(color)
                .iter()
                .filter(|piece| piece.kind() == PieceKind::King)
                .count();
            if kings != 1 {
                Err(PlacementError::KingCount(color, kings))?
            }
        }

        if game.is_in_check(to_move.opposite())? {
            Err(PlacementError::OpponentInCheck(to_move.opposite()))?
        }
        game.state.current_player = to_move;
        game.state.in_check = game.is_in_check(to_move)?;
        if game.state.in_check && game.is_checkmate(to_move)? {
            // The mating side stays the current player, as after a mating move.
            game.state.current_player = to_move.opposite();
            game.state.terminated = true;
        }

        debug!("loaded {} with {} to move", placement, to_move);
        Ok(game)
    }

    /// Piece placement field for the current board, the inverse of
    /// `from_placement`.
    pub fn to_placement(&self) -> String {
        let mut placement = String::with_capacity(64);

        for row in 0..self.board.rows() {
            let mut curr_empty_count = 0;
            for column in 0..self.board.columns() {
                match self.piece_at(Position::new(row, column)) {
                    Some(piece) => {
                        if curr_empty_count != 0 {
                            placement += &curr_empty_count.to_string();
                            curr_empty_count = 0;
                        }
                        placement.push(piece.symbol());
                    }
                    None => curr_empty_count += 1,
                }
            }
            if curr_empty_count != 0 {
                placement += &curr_empty_count.to_string();
            }
            if row + 1 != self.board.rows() {
                placement.push('/');
            }
        }
        placement
    }
}
