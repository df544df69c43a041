mod commands;
mod responses;

pub use commands::{CommandParseError, ReadCommand, StdinCommandReader};
pub(crate) use commands::{square_name, Command};
pub(crate) use responses::{describe_error, Prompt, SessionResponse};
