//! Positional command-line arguments of the two consoles.
//!
//! - `chat-client <loginID> [host] [port]`
//! - `chat-server [port]`

use thiserror::Error;

use crate::config::{ClientConfig, ServerConfig};
use crate::console::parse_port;

/// Argument errors that stop a console before it starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("ERROR - No login ID specified. Connection aborted.")]
    MissingLoginId,
}

/// Parsed client arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientArgs {
    /// Identity announced with `#login`.
    pub login_id: String,
    /// Host to connect to.
    pub host: String,
    /// Port to connect to.
    pub port: u16,
    /// Set when the port argument was unusable and the default was taken.
    pub warning: Option<String>,
}

/// Parsed server arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerArgs {
    /// Port to listen on.
    pub port: u16,
    /// Set when the port argument was unusable and the default was taken.
    pub warning: Option<String>,
}

/// Parse client arguments (program name excluded).
pub fn parse_client_args<I>(args: I, defaults: &ClientConfig) -> Result<ClientArgs, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let login_id = args.next().ok_or(CliError::MissingLoginId)?;
    let host = args.next().unwrap_or_else(|| defaults.host.clone());
    let (port, warning) = port_or_default(args.next().as_deref(), defaults.port);

    Ok(ClientArgs {
        login_id,
        host,
        port,
        warning,
    })
}

/// Parse server arguments (program name excluded).
///
/// The port is the first argument.
pub fn parse_server_args<I>(args: I, defaults: &ServerConfig) -> ServerArgs
where
    I: IntoIterator<Item = String>,
{
    let (port, warning) = port_or_default(args.into_iter().next().as_deref(), defaults.port);
    ServerArgs { port, warning }
}

fn port_or_default(arg: Option<&str>, default: u16) -> (u16, Option<String>) {
    match arg {
        None => (default, None),
        Some(raw) => match parse_port(raw) {
            Some(port) => (port, None),
            None => (
                default,
                Some(format!("Wrong port format. Using default port {default}.")),
            ),
        },
    }
}
