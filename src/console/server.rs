//! Server console: command vocabulary and broadcast of operator messages.

use tracing::{info, warn};

use super::command::{CommandError, CommandResult, Context, Handler, Role};
use super::session::RoleKind;
use super::{guard, shared, Console};
use crate::endpoint::ServerEndpoint;

/// Label put in front of operator messages before they are broadcast.
pub const SERVER_MESSAGE_LABEL: &str = "SERVER MESSAGE:";

/// Server role marker.
pub struct ServerRole;

/// Console driving a [`ServerEndpoint`].
pub type ServerConsole = Console<ServerRole>;

const SERVER_COMMANDS: &[(&str, Handler<ServerRole>)] = &[
    ("quit", quit),
    ("stop", stop),
    ("close", close),
    ("start", start),
    ("setport", shared::set_port::<ServerRole>),
    ("getport", shared::get_port::<ServerRole>),
];

impl Role for ServerRole {
    type Endpoint = dyn ServerEndpoint;

    const KIND: RoleKind = RoleKind::Server;

    fn commands() -> &'static [(&'static str, Handler<Self>)] {
        SERVER_COMMANDS
    }

    fn is_active(endpoint: &Self::Endpoint) -> bool {
        endpoint.is_listening()
    }

    fn deliver(ctx: &mut Context<'_, Self>, line: &str) {
        let message = format!("{SERVER_MESSAGE_LABEL} {line}");
        ctx.display.show(&message);
        if let Err(e) = ctx.endpoint.broadcast(&message) {
            warn!("Broadcast failed: {}", e);
            ctx.display
                .show(&CommandError::Endpoint(e.to_string()).to_string());
        }
    }
}

impl Console<ServerRole> {
    /// Begin listening, as `#start` would.
    pub fn listen_on_startup(&mut self) -> CommandResult {
        self.run_handler(start)
    }
}

/// Close every open connection; returns how many were asked to close.
fn close_connections(endpoint: &dyn ServerEndpoint) -> usize {
    let connections = endpoint.active_connections();
    for connection in &connections {
        if let Err(e) = connection.close() {
            warn!("Failed to close connection {}: {}", connection.id(), e);
        }
    }
    connections.len()
}

/// `#quit`
fn quit(
    ctx: &mut Context<'_, ServerRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    if let Err(e) = ctx.endpoint.stop_listening() {
        warn!("Failed to stop listening: {}", e);
    }
    let closed = close_connections(ctx.endpoint);
    if let Err(e) = ctx.endpoint.close() {
        warn!("Failed to close server: {}", e);
    }
    info!(closed, "server console quitting");
    Ok(CommandResult::exit("Server is closing."))
}

/// `#stop`
fn stop(
    ctx: &mut Context<'_, ServerRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    ctx.endpoint
        .stop_listening()
        .map_err(|e| CommandError::Endpoint(e.to_string()))?;
    Ok(CommandResult::ok(
        "Server has stopped listening for connections.",
    ))
}

/// `#close`
fn close(
    ctx: &mut Context<'_, ServerRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    ctx.endpoint
        .stop_listening()
        .map_err(|e| CommandError::Endpoint(e.to_string()))?;
    let closed = close_connections(ctx.endpoint);
    info!(closed, "server closed");
    Ok(CommandResult::ok(format!(
        "Server closed. {closed} client connection(s) terminated."
    )))
}

/// `#start`
fn start(
    ctx: &mut Context<'_, ServerRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    guard::ensure_not_listening(ctx.endpoint)?;

    let port = ctx.session.port();
    ctx.endpoint.listen().map_err(|e| {
        warn!("Could not listen on port {}: {}", port, e);
        CommandError::ListenFailed(port)
    })?;

    Ok(CommandResult::ok(format!(
        "Server listening for connections on port {}.",
        ctx.endpoint.port()
    )))
}
