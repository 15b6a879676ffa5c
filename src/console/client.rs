//! Client console: command vocabulary and message delivery.

use tracing::{info, warn};

use super::command::{CommandError, CommandResult, Context, Handler, Role};
use super::session::RoleKind;
use super::{guard, shared, Console};
use crate::endpoint::ClientEndpoint;

/// Client role marker.
pub struct ClientRole;

/// Console driving a [`ClientEndpoint`].
pub type ClientConsole = Console<ClientRole>;

const CLIENT_COMMANDS: &[(&str, Handler<ClientRole>)] = &[
    ("quit", quit),
    ("logoff", logoff),
    ("login", login),
    ("sethost", shared::set_host::<ClientRole>),
    ("setport", shared::set_port::<ClientRole>),
    ("gethost", shared::get_host::<ClientRole>),
    ("getport", shared::get_port::<ClientRole>),
];

impl Role for ClientRole {
    type Endpoint = dyn ClientEndpoint;

    const KIND: RoleKind = RoleKind::Client;

    fn commands() -> &'static [(&'static str, Handler<Self>)] {
        CLIENT_COMMANDS
    }

    fn is_active(endpoint: &Self::Endpoint) -> bool {
        endpoint.is_connected()
    }

    fn deliver(ctx: &mut Context<'_, Self>, line: &str) {
        if let Err(e) = ctx.endpoint.send(line) {
            warn!("Failed to send message: {}", e);
            ctx.display.show(&CommandError::SendFailed.to_string());
        }
    }
}

impl Console<ClientRole> {
    /// Connect and announce the login identity, as `#login` would.
    ///
    /// A failed connection is reported and the console stays usable so the
    /// operator can fix the host or port and `#login` by hand.
    pub fn connect_on_startup(&mut self) -> CommandResult {
        self.run_handler(login)
    }
}

/// `#quit`
fn quit(
    ctx: &mut Context<'_, ClientRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    if let Err(e) = ctx.endpoint.quit() {
        warn!("Endpoint shutdown failed: {}", e);
    }
    info!("client console quitting");
    Ok(CommandResult::exit("Closing program."))
}

/// `#logoff`
fn logoff(
    ctx: &mut Context<'_, ClientRole>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    ctx.endpoint
        .disconnect()
        .map_err(|e| CommandError::Endpoint(e.to_string()))?;
    info!("client logged off");
    Ok(CommandResult::ok("Connection closed."))
}

/// `#login [id]`
fn login(
    ctx: &mut Context<'_, ClientRole>,
    args: &[String],
) -> Result<CommandResult, CommandError> {
    guard::ensure_not_connected(ctx.endpoint)?;

    if let Some(id) = args.first() {
        ctx.session.set_login_id(id.as_str());
    }

    let host = ctx.session.host().to_string();
    let port = ctx.session.port();

    ctx.endpoint.connect().map_err(|e| {
        warn!("Could not connect to {}:{}: {}", host, port, e);
        CommandError::ConnectFailed {
            host: host.clone(),
            port,
        }
    })?;

    let Some(id) = ctx.session.login_id() else {
        info!(%host, port, "connected without login identity");
        return Ok(CommandResult::ok(format!("Connected to {host}:{port}.")));
    };

    ctx.endpoint.send(&format!("#login {id}")).map_err(|e| {
        warn!("Login announcement failed: {}", e);
        CommandError::SendFailed
    })?;
    info!(%host, port, login_id = %id, "logged in");

    Ok(CommandResult::ok(format!("Logged in as {id}.")))
}
