use std::fmt;

use log::debug;
use log::info;
use serde::{Deserialize, Serialize};

use crate::bitboard::BitBoard;
use crate::board::{Board, BoardError};
use crate::move_gen::MoveContext;
use crate::piece::{Color, Piece, PieceId, PieceKind};
use crate::position::{Move, Position};
use crate::rules::Rules;

mod check;
mod execute;
mod setup;

pub use self::setup::PlacementError;

/// Why a command was refused. Always recoverable: the match is unchanged.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalMove {
    #[error("there is no piece at the chosen origin {0}")]
    NoPieceAtOrigin(Position),

    #[error("the piece at {0} is not yours")]
    NotYourPiece(Position),

    #[error("the piece at {0} has no possible moves")]
    NoPossibleMoves(Position),

    #[error("{1} is not a valid destination for the piece at {0}")]
    InvalidDestination(Position, Position),

    #[error("you cannot place yourself in check")]
    SelfCheck,

    #[error("the match is over")]
    GameOver,

    #[error("there is no move to take back")]
    NothingToTakeBack,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum MatchError {
    #[error("illegal move: {0}")]
    IllegalMove(#[from] IllegalMove),

    /// Corrupted state, not a bad input.
    #[error("there is no {0} king on the board")]
    NoKing(Color),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl MatchError {
    /// Illegal moves can be reported and retried; anything else means the
    /// match state can no longer be trusted.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MatchError::IllegalMove(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchState {
    pub turn: u32,
    pub current_player: Color,
    /// Whether `current_player` is in check. After a checkmate it refers to
    /// the mated side.
    pub in_check: bool,
    pub terminated: bool,
    /// Pawn that just advanced two rows and may be taken en passant on the
    /// next move only.
    pub en_passant_vulnerable: Option<PieceId>,
}

impl MatchState {
    fn start() -> Self {
        Self {
            turn: 1,
            current_player: Color::White,
            in_check: false,
            terminated: false,
            en_passant_vulnerable: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum SpecialMove {
    Normal,
    Castle {
        rook: PieceId,
        rook_src: Position,
        rook_dest: Position,
    },
    EnPassant {
        captured_at: Position,
    },
}

/// Everything needed to reverse an executed move.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlayedMove {
    pub mve: Move,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub special: SpecialMove,
    pub promotion: Option<PieceKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct PreviousMoveState {
    state: MatchState,
    played: PlayedMove,
}

#[derive(Clone, Debug)]
pub struct Match {
    board: Board,
    pieces: Vec<Piece>,
    captured: Vec<PieceId>,
    state: MatchState,
    rules: Rules,
    history: Vec<PreviousMoveState>,
}

impl Match {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Every piece ever placed, captured ones included.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.board.piece_at(position).map(|id| self.piece(id))
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn rules(&self) -> Rules {
        self.rules
    }

    pub fn turn(&self) -> u32 {
        self.state.turn
    }

    pub fn current_player(&self) -> Color {
        self.state.current_player
    }

    pub fn is_check(&self) -> bool {
        self.state.in_check
    }

    pub fn is_terminated(&self) -> bool {
        self.state.terminated
    }

    /// The side that delivered mate. The player does not switch on the
    /// mating move, so this is the current player of a finished match.
    pub fn winner(&self) -> Option<Color> {
        self.state.terminated.then_some(self.state.current_player)
    }

    /// Ids of captured pieces, in capture order.
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    pub fn captured_pieces(&self, color: Color) -> Vec<&Piece> {
        self.captured
            .iter()
            .map(|&id| self.piece(id))
            .filter(|piece| piece.color() == color)
            .collect()
    }

    pub fn pieces_in_play(&self, color: Color) -> Vec<&Piece> {
        self.pieces
            .iter()
            .filter(|piece| piece.color() == color && piece.is_in_play())
            .collect()
    }

    pub fn played_moves(&self) -> impl Iterator<Item = &PlayedMove> {
        self.history.iter().map(|prev| &prev.played)
    }

    pub(crate) fn context(&self, in_check: bool) -> MoveContext<'_> {
        MoveContext {
            board: &self.board,
            pieces: &self.pieces,
            in_check,
            en_passant_vulnerable: self.state.en_passant_vulnerable,
            rules: self.rules,
        }
    }

    /// Context for generating the moves of `color` in the current state.
    pub fn context_for(&self, color: Color) -> MoveContext<'_> {
        self.context(color == self.state.current_player && self.state.in_check)
    }

    /// Pseudo-legal destinations of the piece at `origin`, e.g. for
    /// highlighting.
    pub fn possible_moves(&self, origin: Position) -> Result<BitBoard, MatchError> {
        let piece = self
            .piece_at(origin)
            .ok_or(IllegalMove::NoPieceAtOrigin(origin))?;
        Ok(piece.possible_moves(&self.context_for(piece.color())))
    }

    pub(crate) fn pseudo_legal_moves(&self, color: Color, in_check: bool) -> Vec<Move> {
        let ctx = self.context(in_check);
        let mut moves = Vec::new();
        for piece in self.pieces_in_play(color) {
            if let Some(src) = piece.position() {
                moves.extend(
                    piece
                        .possible_moves(&ctx)
                        .into_iter()
                        .map(|dest| Move::new(src, dest)),
                );
            }
        }
        moves
    }

    /// Moves of the current player that do not leave their own king in
    /// check. Empty once the match is over.
    pub fn legal_moves(&mut self) -> Result<Vec<Move>, MatchError> {
        if self.state.terminated {
            return Ok(Vec::new());
        }

        let player = self.state.current_player;
        let mut legal = Vec::new();
        for mve in self.pseudo_legal_moves(player, self.state.in_check) {
            if !self.leaves_in_check(player, mve)? {
                legal.push(mve);
            }
        }
        Ok(legal)
    }

    pub fn validate_origin(&self, position: Position) -> Result<(), MatchError> {
        if self.state.terminated {
            return Err(IllegalMove::GameOver.into());
        }

        let piece = self
            .piece_at(position)
            .ok_or(IllegalMove::NoPieceAtOrigin(position))?;

        if piece.color() != self.state.current_player {
            return Err(IllegalMove::NotYourPiece(position).into());
        }
        if !piece.has_possible_moves(&self.context_for(piece.color())) {
            return Err(IllegalMove::NoPossibleMoves(position).into());
        }
        Ok(())
    }

    pub fn validate_destination(&self, origin: Position, dest: Position) -> Result<(), MatchError> {
        let piece = self
            .piece_at(origin)
            .ok_or(IllegalMove::NoPieceAtOrigin(origin))?;

        if !piece.can_move_to(dest, &self.context_for(piece.color())) {
            return Err(IllegalMove::InvalidDestination(origin, dest).into());
        }
        Ok(())
    }

    /// Plays a move for the current player. On error nothing has changed.
    pub fn realize_move(&mut self, src: Position, dest: Position) -> Result<PlayedMove, MatchError> {
        self.validate_origin(src)?;
        self.validate_destination(src, dest)?;

        let mover = self.state.current_player;
        let mut played = self.execute_move(src, dest)?;

        let self_check = match self.is_in_check(mover) {
            Ok(self_check) => self_check,
            Err(err) => {
                self.undo_move(&played)?;
                return Err(err);
            }
        };
        if self_check {
            self.undo_move(&played)?;
            debug!("{} tried {:?}, which leaves its king in check", mover, played.mve);
            return Err(IllegalMove::SelfCheck.into());
        }

        let moved_pawn = self.piece(played.piece).kind() == PieceKind::Pawn;
        if moved_pawn && self.rules.promote_pawns && self.is_last_row(mover, dest) {
            self.pieces[played.piece.index()].set_kind(PieceKind::Queen);
            played.promotion = Some(PieceKind::Queen);
        }

        let prev_state = self.state.clone();

        self.state.en_passant_vulnerable =
            (moved_pawn && src.row_diff(dest).abs() == 2).then_some(played.piece);

        let opponent = mover.opposite();
        let (in_check, mated) = match self.check_status(opponent) {
            Ok(status) => status,
            Err(err) => {
                self.state = prev_state;
                self.undo_move(&played)?;
                return Err(err);
            }
        };
        self.state.in_check = in_check;

        if mated {
            self.state.terminated = true;
            info!("checkmate on turn {}, {} wins", self.state.turn, mover);
        } else {
            self.state.turn += 1;
            self.state.current_player = opponent;
        }

        debug!(
            "turn {}: {} played {:?}, captured: {:?}, special: {:?}",
            prev_state.turn, mover, played.mve, played.captured, played.special
        );

        self.history.push(PreviousMoveState {
            state: prev_state,
            played: played.clone(),
        });
        Ok(played)
    }

    /// Reverts the last committed move, board and state alike.
    pub fn take_back(&mut self) -> Result<PlayedMove, MatchError> {
        let prev = self.history.pop().ok_or(IllegalMove::NothingToTakeBack)?;
        self.undo_move(&prev.played)?;
        self.state = prev.state;
        debug!("took back {:?}", prev.played.mve);
        Ok(prev.played)
    }

    /// Whether `color` is in check, and whether that check is mate.
    fn check_status(&mut self, color: Color) -> Result<(bool, bool), MatchError> {
        let in_check = self.is_in_check(color)?;
        Ok((in_check, in_check && self.is_checkmate(color)?))
    }

    fn is_last_row(&self, color: Color, position: Position) -> bool {
        match color {
            Color::White => position.row() == 0,
            Color::Black => position.row() + 1 == self.board.rows(),
        }
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..self.board.rows())
            .map(|row| {
                (0..self.board.columns())
                    .map(|column| {
                        self.piece_at(Position::new(row, column))
                            .map_or('.', |piece| piece.symbol())
                    })
                    .collect()
            })
            .collect();
        write!(f, "{}", rows.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;
    use testresult::TestResult;

    fn pos(row: u8, column: u8) -> Position {
        Position::new(row, column)
    }

    #[test]
    fn test_display() {
        let got = Match::new();
        let want = "rnbqkbnr\npppppppp\n........\n........\n........\n........\nPPPPPPPP\nRNBQKBNR";

        assert_eq!(format!("{}", got), want);
    }

    #[test]
    fn test_state_start() {
        let game = Match::new();

        assert_eq!(game.turn(), 1);
        assert_eq!(game.current_player(), Color::White);
        assert!(!game.is_check());
        assert!(!game.is_terminated());
        assert_eq!(game.state().en_passant_vulnerable, None);
        assert_eq!(game.pieces_in_play(Color::White).len(), 16);
        assert_eq!(game.pieces_in_play(Color::Black).len(), 16);
        assert!(game.captured().is_empty());
    }

    #[test_case(pos(4, 4), IllegalMove::NoPieceAtOrigin(pos(4, 4)) ; "empty square")]
    #[test_case(pos(1, 4), IllegalMove::NotYourPiece(pos(1, 4)) ; "black pawn on white turn")]
    #[test_case(pos(7, 0), IllegalMove::NoPossibleMoves(pos(7, 0)) ; "boxed in rook")]
    fn test_validate_origin_err(origin: Position, want: IllegalMove) {
        let game = Match::new();
        assert_eq!(game.validate_origin(origin), Err(MatchError::IllegalMove(want)));
    }

    #[test]
    fn test_validate_destination() -> TestResult {
        let game = Match::new();
        game.validate_origin(pos(7, 1))?;
        game.validate_destination(pos(7, 1), pos(5, 2))?;

        assert_eq!(
            game.validate_destination(pos(7, 1), pos(6, 3)),
            Err(MatchError::IllegalMove(IllegalMove::InvalidDestination(
                pos(7, 1),
                pos(6, 3)
            )))
        );
        assert_eq!(
            game.validate_destination(pos(7, 1), pos(9, 3)),
            Err(MatchError::IllegalMove(IllegalMove::InvalidDestination(
                pos(7, 1),
                pos(9, 3)
            )))
        );
        Ok(())
    }

    #[test]
    fn test_realize_move_advances_turn() -> TestResult {
        let mut game = Match::new();
        game.realize_move(pos(6, 4), pos(4, 4))?;

        assert_eq!(game.turn(), 2);
        assert_eq!(game.current_player(), Color::Black);
        assert_eq!(game.piece_at(pos(4, 4)).map(Piece::symbol), Some('P'));
        assert!(game.piece_at(pos(6, 4)).is_none());
        Ok(())
    }

    #[test]
    fn test_rejected_move_changes_nothing() -> TestResult {
        let mut game = Match::new();
        game.realize_move(pos(6, 4), pos(4, 4))?;
        let before = game.state().clone();

        let res = game.realize_move(pos(6, 3), pos(4, 3));
        assert_eq!(
            res,
            Err(MatchError::IllegalMove(IllegalMove::NotYourPiece(pos(6, 3))))
        );
        assert_eq!(game.state(), &before);
        Ok(())
    }

    #[test]
    fn test_legal_moves_start() -> TestResult {
        let mut game = Match::new();
        assert_eq!(game.legal_moves()?.len(), 20);
        Ok(())
    }

    #[test]
    fn test_take_back() -> TestResult {
        let mut game = Match::new();
        let start_board = game.board().clone();
        let start_pieces = game.pieces().to_vec();

        game.realize_move(pos(6, 4), pos(4, 4))?;
        let played = game.take_back()?;

        assert_eq!(played.mve, Move::new(pos(6, 4), pos(4, 4)));
        assert_eq!(game.board(), &start_board);
        assert_eq!(game.pieces(), start_pieces.as_slice());
        assert_eq!(game.state(), &MatchState::start());
        assert_eq!(
            game.take_back(),
            Err(MatchError::IllegalMove(IllegalMove::NothingToTakeBack))
        );
        Ok(())
    }

    #[test_case(Color::White ; "mover has no king")]
    #[test_case(Color::Black ; "opponent has no king")]
    fn test_missing_king_rolls_back(missing: Color) -> TestResult {
        let mut game = Match::empty(Rules::default());
        game.place_new_piece(PieceKind::Rook, Color::White, pos(7, 0))?;
        game.place_new_piece(PieceKind::Pawn, Color::White, pos(1, 1))?;
        game.place_new_piece(PieceKind::Rook, Color::Black, pos(0, 0))?;
        if missing == Color::Black {
            game.place_new_piece(PieceKind::King, Color::White, pos(7, 4))?;
        } else {
            game.place_new_piece(PieceKind::King, Color::Black, pos(0, 4))?;
        }
        let before = game.clone();

        assert_eq!(game.realize_move(pos(1, 1), pos(0, 0)), Err(MatchError::NoKing(missing)));
        assert_eq!(game.to_placement(), before.to_placement());
        assert_eq!(game.pieces(), before.pieces());
        assert_eq!(game.state(), before.state());
        assert!(game.captured().is_empty());
        assert_eq!(game.played_moves().count(), 0);
        Ok(())
    }

    #[test]
    fn test_is_recoverable() {
        assert!(MatchError::IllegalMove(IllegalMove::SelfCheck).is_recoverable());
        assert!(!MatchError::NoKing(Color::White).is_recoverable());
        assert!(!MatchError::Board(BoardError::NoPiece(pos(0, 0))).is_recoverable());
    }
}
