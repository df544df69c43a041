use std::fmt;

use chess_rules::bitboard::BitBoard;
use chess_rules::game::{IllegalMove, Match, MatchError};
use chess_rules::piece::{Color, Piece};
use chess_rules::position::Position;

use super::commands::square_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Prompt {
    Origin,
    Destination,
}

#[derive(Debug)]
pub(crate) enum SessionResponse<'a> {
    /// Board with the squares in `highlight` marked.
    Board { game: &'a Match, highlight: BitBoard },
    Status { game: &'a Match },
    Prompt(Prompt),
    Rejected(String),
    Help,
    Goodbye,
}

impl fmt::Display for SessionResponse<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionResponse::Board { game, highlight } => render_board(f, game, *highlight),
            SessionResponse::Status { game } => render_status(f, game),
            SessionResponse::Prompt(Prompt::Origin) => write!(f, "Origin: "),
            SessionResponse::Prompt(Prompt::Destination) => write!(f, "Destination: "),
            SessionResponse::Rejected(reason) => writeln!(f, "{}", reason),
            SessionResponse::Help => writeln!(
                f,
                "Enter a square (e2) to pick a piece, then a square to move it to.\n\
                 A whole move (e2e4) works too.\n\
                 undo: take back the last move, new: start over, quit: leave"
            ),
            SessionResponse::Goodbye => writeln!(f, "Bye."),
        }
    }
}

fn render_board(f: &mut fmt::Formatter<'_>, game: &Match, highlight: BitBoard) -> fmt::Result {
    let board = game.board();

    for row in 0..board.rows() {
        let mut line = format!("{} ", board.rows() - row);
        for column in 0..board.columns() {
            let position = Position::new(row, column);
            let marked = highlight.is_set(position);
            match (game.piece_at(position), marked) {
                (Some(piece), true) => {
                    line.push(piece.symbol());
                    line.push('*');
                }
                (Some(piece), false) => {
                    line.push(piece.symbol());
                    line.push(' ');
                }
                (None, true) => line.push_str("* "),
                (None, false) => line.push_str("- "),
            }
        }
        writeln!(f, "{}", line.trim_end())?;
    }

    let files: Vec<String> = (0..board.columns())
        .map(|column| ((b'a' + column) as char).to_string())
        .collect();
    writeln!(f, "  {}", files.join(" "))
}

fn render_pieces(pieces: &[&Piece]) -> String {
    let symbols: Vec<String> = pieces.iter().map(|piece| piece.symbol().to_string()).collect();
    format!("[{}]", symbols.join(" "))
}

fn render_status(f: &mut fmt::Formatter<'_>, game: &Match) -> fmt::Result {
    writeln!(f, "Captured pieces:")?;
    writeln!(f, "White: {}", render_pieces(&game.captured_pieces(Color::White)))?;
    writeln!(f, "Black: {}", render_pieces(&game.captured_pieces(Color::Black)))?;
    writeln!(f, "Turn: {}", game.turn())?;

    match game.winner() {
        Some(winner) => {
            writeln!(f, "CHECKMATE!")?;
            writeln!(f, "Winner: {}", winner)
        }
        None => {
            writeln!(f, "Waiting for: {}", game.current_player())?;
            if game.is_check() {
                writeln!(f, "CHECK!")?;
            }
            Ok(())
        }
    }
}

/// User-facing text for a refused command, squares in algebraic notation.
pub(crate) fn describe_illegal_move(reason: &IllegalMove) -> String {
    match reason {
        IllegalMove::NoPieceAtOrigin(position) => {
            format!("There is no piece on {}.", square_name(*position))
        }
        IllegalMove::NotYourPiece(position) => {
            format!("The piece on {} is not yours.", square_name(*position))
        }
        IllegalMove::NoPossibleMoves(position) => {
            format!("The piece on {} has no possible moves.", square_name(*position))
        }
        IllegalMove::InvalidDestination(src, dest) => format!(
            "The piece on {} cannot move to {}.",
            square_name(*src),
            square_name(*dest)
        ),
        IllegalMove::SelfCheck => "You cannot place yourself in check.".to_string(),
        IllegalMove::GameOver => "The match is over. Type `new` or `undo`.".to_string(),
        IllegalMove::NothingToTakeBack => "There is no move to take back.".to_string(),
    }
}

/// `None` for errors that mean the match state is corrupted.
pub(crate) fn describe_error(err: &MatchError) -> Option<String> {
    match err {
        MatchError::IllegalMove(reason) => Some(describe_illegal_move(reason)),
        MatchError::NoKing(_) | MatchError::Board(_) => None,
    }
}
