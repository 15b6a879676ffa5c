//! simplechat - operator consoles for a minimal TCP chat client and server.
//!
//! Both consoles share one [`Console`] type; the role decides the command
//! vocabulary and which [`endpoint`] trait it drives.

pub mod cli;
pub mod config;
pub mod console;
pub mod endpoint;
pub mod error;
pub mod logging;

pub use cli::{parse_client_args, parse_server_args, ClientArgs, CliError, ServerArgs};
pub use config::{Config, DEFAULT_PORT};
pub use console::{
    ClientConsole, ClientRole, CommandError, CommandResult, Console, ConsoleExit, DisplaySink,
    ResultKind, ServerConsole, ServerRole, Session, StdoutDisplay,
};
pub use endpoint::{
    ClientEndpoint, ConnectionHandle, Endpoint, ServerEndpoint, TcpChatClient, TcpChatServer,
};
pub use error::{ChatError, Result};
