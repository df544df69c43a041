mod messages;
mod session;
mod state;

pub use messages::{CommandParseError, ReadCommand, StdinCommandReader};
pub use session::Session;
