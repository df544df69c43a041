use std::io::Write;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use statig::prelude::{InitializedStateMachine, IntoStateMachineExt};
use tracing::warn;

use chess_rules::game::Match;
use chess_rules::rules::Rules;

use crate::{messages::Command, state::SessionState};

/// An interactive match: feed it input lines, it writes boards, prompts and
/// rejections to the response writer.
pub struct Session<W>
where
    W: Write + Send + 'static,
{
    state_machine: InitializedStateMachine<SessionState<W>>,
    response_writer: Arc<Mutex<W>>,
}

impl<W> Session<W>
where
    W: Write + Send + 'static,
{
    pub fn new(rules: Rules, response_writer: Arc<Mutex<W>>) -> Self {
        let session_state = SessionState::new(rules, Arc::clone(&response_writer));
        let session_state_machine = session_state.uninitialized_state_machine().init();
        Self {
            state_machine: session_state_machine,
            response_writer,
        }
    }

    /// Errors only when the match itself can no longer be trusted; bad input
    /// is answered on the response writer.
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        match Command::from_str(line) {
            Ok(command) => self.state_machine.handle(&command),
            Err(err) => {
                warn!("{}", err);
                if let Ok(mut response_writer) = self.response_writer.lock() {
                    writeln!(response_writer, "Unknown command. Type `help` for the list.")?;
                }
            }
        }

        if let Some(err) = &self.state_machine.fatal {
            bail!("match state corrupted: {}", err);
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.state_machine.quit
    }

    pub fn game(&self) -> &Match {
        &self.state_machine.game
    }
}
