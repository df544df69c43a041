use core::fmt;
use std::fmt::Display;
use std::io;
use std::str::FromStr;

use anyhow::Result;
use chess_rules::position::Position;
use winnow::combinator::{alt, eof, terminated};
use winnow::token::one_of;
use winnow::Parser;
use winnow::Result as WinnowResult;

/// Rows and columns of the board the session plays on.
const BOARD_SIZE: u8 = 8;

pub trait ReadCommand {
    fn read_command(&self) -> Result<Option<String>>;
}

pub struct StdinCommandReader;

impl ReadCommand for StdinCommandReader {
    /// `None` once stdin is closed.
    fn read_command(&self) -> Result<Option<String>> {
        let mut buffer = String::new();
        if io::stdin().read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer))
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum Command {
    /// Origin or destination, depending on what the session waits for.
    Square(Position),
    Move { src: Position, dest: Position },
    Undo,
    New,
    Help,
    Quit,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Square(position) => write!(f, "{}", square_name(*position)),
            Command::Move { src, dest } => {
                write!(f, "{}{}", square_name(*src), square_name(*dest))
            }
            Command::Undo => write!(f, "undo"),
            Command::New => write!(f, "new"),
            Command::Help => write!(f, "help"),
            Command::Quit => write!(f, "quit"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct CommandParseError(String);

impl Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CommandParseError {}

impl FromStr for Command {
    type Err = CommandParseError;
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim().to_ascii_lowercase();
        let command = alt((
            parse_move,
            parse_square,
            parse_undo,
            parse_new,
            parse_help,
            parse_quit,
        ))
        .parse(input.as_str())
        .map_err(|_| CommandParseError(format!("cannot parse: [{}]", input)));
        command
    }
}

/// Algebraic name of a board position, e.g. row 6, column 4 -> "e2".
pub(crate) fn square_name(position: Position) -> String {
    let file = (b'a' + position.column()) as char;
    let rank = BOARD_SIZE - position.row();
    format!("{}{}", file, rank)
}

// ======================================================
// Winnow Parsing functions
// ======================================================

fn parse_position(input: &mut &str) -> WinnowResult<Position> {
    (one_of('a'..='h'), one_of('1'..='8'))
        .map(|(file, rank): (char, char)| {
            let column = file as u8 - b'a';
            let row = BOARD_SIZE - (rank as u8 - b'0');
            Position::new(row, column)
        })
        .parse_next(input)
}

fn parse_square(input: &mut &str) -> WinnowResult<Command> {
    terminated(parse_position, eof)
        .map(Command::Square)
        .parse_next(input)
}

fn parse_move(input: &mut &str) -> WinnowResult<Command> {
    (parse_position, alt((" ", "-", "")), parse_position)
        .map(|(src, _, dest)| Command::Move { src, dest })
        .parse_next(input)
}

fn parse_undo(input: &mut &str) -> WinnowResult<Command> {
    alt(("undo", "u")).value(Command::Undo).parse_next(input)
}

fn parse_new(input: &mut &str) -> WinnowResult<Command> {
    "new".value(Command::New).parse_next(input)
}

fn parse_help(input: &mut &str) -> WinnowResult<Command> {
    alt(("help", "?")).value(Command::Help).parse_next(input)
}

fn parse_quit(input: &mut &str) -> WinnowResult<Command> {
    alt(("quit", "exit", "q")).value(Command::Quit).parse_next(input)
}
