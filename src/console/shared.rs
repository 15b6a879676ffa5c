//! Handlers both roles share: host and port configuration.

use tracing::info;

use super::command::{CommandError, CommandResult, Context, Role};
use super::guard;
use crate::endpoint::Endpoint;

/// `#sethost <host>`
pub(crate) fn set_host<R: Role>(
    ctx: &mut Context<'_, R>,
    args: &[String],
) -> Result<CommandResult, CommandError> {
    guard::ensure_inactive::<R>(ctx.endpoint, "host")?;

    let [host] = args else {
        return Err(CommandError::WrongFormat {
            command: "sethost",
            field: "host",
        });
    };

    ctx.session.set_host(host.as_str());
    ctx.endpoint.set_host(host);
    info!(role = %R::KIND, %host, "host changed");

    Ok(CommandResult::ok(format!("Host is now {host}.")))
}

/// `#setport <port>`
pub(crate) fn set_port<R: Role>(
    ctx: &mut Context<'_, R>,
    args: &[String],
) -> Result<CommandResult, CommandError> {
    guard::ensure_inactive::<R>(ctx.endpoint, "port")?;

    let [port] = args else {
        return Err(CommandError::WrongFormat {
            command: "setport",
            field: "port",
        });
    };

    let port = parse_port(port).ok_or(CommandError::PortFormat)?;

    ctx.session.set_port(port);
    ctx.endpoint.set_port(port);
    info!(role = %R::KIND, port, "port changed");

    Ok(CommandResult::ok(format!("Port is now {port}.")))
}

/// `#gethost`
pub(crate) fn get_host<R: Role>(
    ctx: &mut Context<'_, R>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    Ok(CommandResult::ok(format!("Host: {}", ctx.session.host())))
}

/// `#getport`
pub(crate) fn get_port<R: Role>(
    ctx: &mut Context<'_, R>,
    _args: &[String],
) -> Result<CommandResult, CommandError> {
    Ok(CommandResult::ok(format!("Port: {}", ctx.session.port())))
}

/// Parse a base-10 TCP port. Zero is not a usable port.
pub fn parse_port(s: &str) -> Option<u16> {
    s.parse::<u16>().ok().filter(|port| *port != 0)
}
