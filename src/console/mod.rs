//! Interactive operator console shared by the client and server.
//!
//! A console reads one line at a time, tells `#commands` apart from chat
//! text, and drives its endpoint:
//! - Chat text goes to `send` (client) or `broadcast` (server)
//! - Commands are looked up in the role's table and run against the endpoint
//! - Every command reports exactly one line through the [`DisplaySink`]

mod client;
mod command;
mod display;
pub mod guard;
mod lexer;
mod server;
mod session;
mod shared;

use std::io::BufRead;
use std::sync::Arc;

use tracing::{debug, error, info};

pub use client::{ClientConsole, ClientRole};
pub use command::{
    CommandError, CommandResult, CommandTable, Context, Handler, LoopControl, ResultKind, Role,
};
pub use display::{format_line, DisplaySink, StdoutDisplay, PROMPT_PREFIX};
pub use lexer::{parse_line, Command, ConsoleInput, COMMAND_PREFIX};
pub use server::{ServerConsole, ServerRole, SERVER_MESSAGE_LABEL};
pub use session::{RoleKind, Session};
pub use shared::parse_port;

/// Reported once when reading operator input fails.
pub const INPUT_ERROR_MESSAGE: &str = "Unexpected error while reading from console!";

/// Why the read loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    /// The operator ran `#quit`.
    Quit,
    /// Input reached end of file.
    EndOfInput,
    /// Reading input failed.
    InputError,
}

/// One console bound to one endpoint.
pub struct Console<R: Role> {
    session: Session,
    endpoint: Box<R::Endpoint>,
    display: Arc<dyn DisplaySink>,
    commands: CommandTable<R>,
}

impl<R: Role> Console<R> {
    /// Create a console owning `endpoint`.
    pub fn new(session: Session, endpoint: Box<R::Endpoint>, display: Arc<dyn DisplaySink>) -> Self {
        Self {
            session,
            endpoint,
            display,
            commands: CommandTable::for_role(),
        }
    }

    /// Current configuration.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The endpoint this console drives.
    pub fn endpoint(&self) -> &R::Endpoint {
        &self.endpoint
    }

    /// Mutable access to the endpoint.
    pub fn endpoint_mut(&mut self) -> &mut R::Endpoint {
        &mut self.endpoint
    }

    /// The role's command table.
    pub fn commands(&self) -> &CommandTable<R> {
        &self.commands
    }

    /// Whether the endpoint is connected or listening right now.
    pub fn is_active(&self) -> bool {
        guard::is_active::<R>(&self.endpoint)
    }

    /// Process one input line.
    pub fn handle_line(&mut self, line: &str) -> LoopControl {
        let display = Arc::clone(&self.display);
        let mut ctx = Context {
            session: &mut self.session,
            endpoint: &mut *self.endpoint,
            display: &*display,
        };

        match parse_line(line) {
            ConsoleInput::Empty => LoopControl::Continue,
            ConsoleInput::Message(message) => {
                R::deliver(&mut ctx, &message);
                LoopControl::Continue
            }
            ConsoleInput::Command(command) => {
                let result = self.commands.dispatch(&mut ctx, &command);
                display.show(result.message());
                result.control()
            }
        }
    }

    /// Read lines from `input` until `#quit`, end of input, or a read error.
    pub fn run<B: BufRead>(&mut self, input: B) -> ConsoleExit {
        info!(role = %R::KIND, "console started");

        for line in input.lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Failed to read console input: {}", e);
                    let result = CommandResult::fatal(INPUT_ERROR_MESSAGE);
                    self.display.show(result.message());
                    return ConsoleExit::InputError;
                }
            };

            if self.handle_line(&line) == LoopControl::Exit {
                info!(role = %R::KIND, "console quit");
                return ConsoleExit::Quit;
            }
        }

        debug!(role = %R::KIND, "console input closed");
        ConsoleExit::EndOfInput
    }

    /// Run one handler with no arguments and show its result.
    pub(crate) fn run_handler(&mut self, handler: Handler<R>) -> CommandResult {
        let mut ctx = Context {
            session: &mut self.session,
            endpoint: &mut *self.endpoint,
            display: &*self.display,
        };
        let result = handler(&mut ctx, &[]).unwrap_or_else(CommandResult::from);
        self.display.show(result.message());
        result
    }
}
