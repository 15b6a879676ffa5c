//! Command results, errors and the per-role dispatch table.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use super::display::DisplaySink;
use super::lexer::Command;
use super::session::{RoleKind, Session};
use crate::endpoint::Endpoint;

/// Outcome category of a handled command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// The command did what was asked.
    Ok,
    /// Malformed command or violated precondition.
    UserError,
    /// The endpoint failed to connect, listen or send.
    ConnectionError,
    /// The console cannot continue.
    Fatal,
}

/// Whether the read loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Read the next line.
    Continue,
    /// Leave the read loop.
    Exit,
}

/// What a command produced: one line for the operator plus loop control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    kind: ResultKind,
    message: String,
    control: LoopControl,
}

impl CommandResult {
    /// Successful command; the loop continues.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Ok,
            message: message.into(),
            control: LoopControl::Continue,
        }
    }

    /// Successful command that ends the read loop.
    pub fn exit(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Ok,
            message: message.into(),
            control: LoopControl::Exit,
        }
    }

    /// Unrecoverable failure; ends the read loop.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self {
            kind: ResultKind::Fatal,
            message: message.into(),
            control: LoopControl::Exit,
        }
    }

    /// Outcome category.
    pub fn kind(&self) -> ResultKind {
        self.kind
    }

    /// Text shown to the operator.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Loop control after this result.
    pub fn control(&self) -> LoopControl {
        self.control
    }
}

impl From<CommandError> for CommandResult {
    fn from(err: CommandError) -> Self {
        let kind = if err.is_connection_error() {
            ResultKind::ConnectionError
        } else {
            ResultKind::UserError
        };
        Self {
            kind,
            message: err.to_string(),
            control: LoopControl::Continue,
        }
    }
}

/// Recoverable command failure. `Display` is the exact operator text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Name not in the role's vocabulary.
    #[error("Did not recognize the command")]
    Unrecognized(String),

    #[error("ERROR: Client already connected.")]
    AlreadyConnected,

    #[error("ERROR: Server is already listening for connections.")]
    AlreadyListening,

    /// Host or port change attempted while connected or listening.
    #[error("ERROR: Close the client before changing {field}s.")]
    EndpointActive { field: &'static str },

    #[error("ERROR: Wrong command format. Use #{command} <{field}>.")]
    WrongFormat {
        command: &'static str,
        field: &'static str,
    },

    #[error("ERROR: Wrong port format. Please enter an integer as port.")]
    PortFormat,

    #[error("ERROR: Could not connect to {host}:{port}.")]
    ConnectFailed { host: String, port: u16 },

    #[error("ERROR: Could not listen for clients on port {0}.")]
    ListenFailed(u16),

    #[error("ERROR: Could not send message to server.")]
    SendFailed,

    /// Any other endpoint failure.
    #[error("ERROR: {0}")]
    Endpoint(String),
}

impl CommandError {
    /// Whether this error came from the network rather than the operator.
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            CommandError::ConnectFailed { .. }
                | CommandError::ListenFailed(_)
                | CommandError::SendFailed
                | CommandError::Endpoint(_)
        )
    }
}

/// Role-specific behaviour plugged into the shared console.
pub trait Role: Sized + 'static {
    /// Endpoint capability set this role drives.
    type Endpoint: Endpoint + ?Sized;

    /// Role tag.
    const KIND: RoleKind;

    /// Fixed command vocabulary of the role.
    fn commands() -> &'static [(&'static str, Handler<Self>)];

    /// Whether the endpoint is connected (client) or listening (server).
    fn is_active(endpoint: &Self::Endpoint) -> bool;

    /// Hand a non-command line to the endpoint.
    fn deliver(ctx: &mut Context<'_, Self>, line: &str);
}

/// Everything a handler may touch.
pub struct Context<'a, R: Role> {
    /// Console configuration.
    pub session: &'a mut Session,
    /// The endpoint being driven.
    pub endpoint: &'a mut R::Endpoint,
    /// Operator output. Handlers report through their result instead.
    pub display: &'a dyn DisplaySink,
}

/// Command handler signature.
pub type Handler<R> = fn(&mut Context<'_, R>, &[String]) -> Result<CommandResult, CommandError>;

/// Command name to handler mapping for one role, built once per console.
pub struct CommandTable<R: Role> {
    handlers: HashMap<&'static str, Handler<R>>,
}

impl<R: Role> CommandTable<R> {
    /// Build the table from the role's vocabulary.
    pub fn for_role() -> Self {
        Self {
            handlers: R::commands().iter().copied().collect(),
        }
    }

    /// Whether `name` is in the vocabulary.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Vocabulary, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run the handler for `command`.
    pub fn dispatch(&self, ctx: &mut Context<'_, R>, command: &Command) -> CommandResult {
        let Some(handler) = self.handlers.get(command.name.as_str()) else {
            debug!(role = %R::KIND, name = %command.name, "unrecognized command");
            return CommandError::Unrecognized(command.name.clone()).into();
        };

        debug!(role = %R::KIND, %command, "dispatching command");
        handler(ctx, &command.args).unwrap_or_else(CommandResult::from)
    }
}
