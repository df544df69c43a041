use std::io::Write;
use std::sync::{Arc, Mutex};

use statig::prelude::*;
use tracing::{debug, error, info, warn};

use chess_rules::bitboard::BitBoard;
use chess_rules::game::{IllegalMove, Match, MatchError};
use chess_rules::position::Position;
use chess_rules::rules::Rules;

use crate::messages::{describe_error, square_name, Command, Prompt, SessionResponse};

pub(crate) struct SessionState<W>
where
    W: Write + Send + 'static,
{
    pub(crate) game: Match,
    rules: Rules,
    response_writer: Arc<Mutex<W>>,
    /// Set when the match reports corrupted state. The session stops there.
    pub(crate) fatal: Option<MatchError>,
    pub(crate) quit: bool,
}

impl<W> SessionState<W>
where
    W: Write + Send + 'static,
{
    pub(crate) fn new(rules: Rules, response_writer: Arc<Mutex<W>>) -> Self {
        let session = Self {
            game: Match::with_rules(rules),
            rules,
            response_writer,
            fatal: None,
            quit: false,
        };
        session.show_match(BitBoard::empty());
        session.respond(SessionResponse::Prompt(Prompt::Origin));
        session
    }

    fn on_dispatch(&mut self, state: StateOrSuperstate<'_, State, Superstate>, event: &Command) {
        debug!("({:?}) > {}", state, event);
    }

    fn respond(&self, response: SessionResponse) {
        write_response(&self.response_writer, &response);
    }

    fn show_match(&self, highlight: BitBoard) {
        self.respond(SessionResponse::Board {
            game: &self.game,
            highlight,
        });
        self.respond(SessionResponse::Status { game: &self.game });
    }

    fn reject(&mut self, err: MatchError) {
        match describe_error(&err) {
            Some(reason) => {
                info!("rejected: {}", err);
                self.respond(SessionResponse::Rejected(reason));
            }
            None => {
                error!("match state corrupted: {}", err);
                self.fatal = Some(err);
            }
        }
    }

    fn play(&mut self, src: Position, dest: Position) -> Response<State> {
        let mover = self.game.current_player();
        match self.game.realize_move(src, dest) {
            Ok(played) => {
                info!(
                    "{} played {}{}, captured: {:?}",
                    mover,
                    square_name(src),
                    square_name(dest),
                    played.captured.map(|id| self.game.piece(id).symbol())
                );
                self.show_match(BitBoard::empty());
                if self.game.is_terminated() {
                    return Transition(State::game_over());
                }
            }
            Err(err) => self.reject(err),
        }
        self.respond(SessionResponse::Prompt(Prompt::Origin));
        Transition(State::awaiting_origin())
    }

    fn restart(&mut self) -> Response<State> {
        self.show_match(BitBoard::empty());
        self.respond(SessionResponse::Prompt(Prompt::Origin));
        Transition(State::awaiting_origin())
    }
}

#[state_machine(
    initial = "State::awaiting_origin()",
    before_dispatch = "Self::on_dispatch",
    state(derive(PartialEq, Eq, Debug)),
    superstate(derive(Debug))
)]
impl<W> SessionState<W>
where
    W: Write + Send + 'static,
{
    #[superstate]
    fn playing(&mut self, event: &Command) -> Response<State> {
        match event {
            Command::Move { src, dest } => self.play(*src, *dest),
            Command::Undo => match self.game.take_back() {
                Ok(played) => {
                    info!("took back {:?}", played.mve);
                    self.restart()
                }
                Err(err) => {
                    self.reject(err);
                    Handled
                }
            },
            Command::New => {
                self.game = Match::with_rules(self.rules);
                self.restart()
            }
            Command::Help => {
                self.respond(SessionResponse::Help);
                Handled
            }
            Command::Quit => {
                self.respond(SessionResponse::Goodbye);
                self.quit = true;
                Handled
            }
            Command::Square(position) => {
                warn!("Unexpected square for current state: {:?}", position);
                Handled
            }
        }
    }

    #[state(superstate = "playing")]
    fn awaiting_origin(&mut self, event: &Command) -> Response<State> {
        match event {
            Command::Square(origin) => {
                let highlight = self
                    .game
                    .validate_origin(*origin)
                    .and_then(|()| self.game.possible_moves(*origin));
                match highlight {
                    Ok(highlight) => {
                        debug!("{} destinations from {}", highlight.count(), square_name(*origin));
                        self.respond(SessionResponse::Board {
                            game: &self.game,
                            highlight,
                        });
                        self.respond(SessionResponse::Prompt(Prompt::Destination));
                        Transition(State::awaiting_destination(*origin))
                    }
                    Err(err) => {
                        self.reject(err);
                        self.respond(SessionResponse::Prompt(Prompt::Origin));
                        Handled
                    }
                }
            }
            _ => Super,
        }
    }

    #[state(superstate = "playing")]
    fn awaiting_destination(
        &mut self,
        origin: &mut Position,
        event: &Command,
    ) -> Response<State> {
        match event {
            Command::Square(dest) => self.play(*origin, *dest),
            _ => Super,
        }
    }

    #[state(superstate = "playing")]
    fn game_over(&mut self, event: &Command) -> Response<State> {
        match event {
            Command::Square(_) | Command::Move { .. } => {
                self.reject(IllegalMove::GameOver.into());
                Handled
            }
            _ => Super,
        }
    }
}

fn write_response(response_writer: &Arc<Mutex<impl Write>>, response: &SessionResponse) {
    let Ok(mut response_writer) = response_writer.lock() else {
        error!("response writer poisoned");
        return;
    };
    let res = write!(response_writer, "{}", response).and_then(|()| response_writer.flush());
    if let Err(err) = res {
        warn!("couldn't write response: {}", err);
    }
}
