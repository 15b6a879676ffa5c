//! Network endpoints driven by the operator consoles.
//!
//! The console only talks to the traits in this module. [`TcpChatClient`]
//! and [`TcpChatServer`] are the TCP implementations used by the binaries.

mod client;
mod server;

pub use client::TcpChatClient;
pub use server::{TcpChatServer, TcpConnection};

use crate::Result;

/// Address configuration shared by both endpoint roles.
pub trait Endpoint {
    /// Host the endpoint connects to or binds on.
    fn host(&self) -> &str;

    /// Change the host used by the next connect or listen.
    fn set_host(&mut self, host: &str);

    /// Port the endpoint connects to or listens on.
    fn port(&self) -> u16;

    /// Change the port used by the next connect or listen.
    fn set_port(&mut self, port: u16);
}

/// Endpoint that connects out to a chat server.
pub trait ClientEndpoint: Endpoint {
    /// Open a connection to the configured host and port.
    fn connect(&mut self) -> Result<()>;

    /// Close the current connection, if any.
    fn disconnect(&mut self) -> Result<()>;

    /// Whether a connection is open right now.
    fn is_connected(&self) -> bool;

    /// Send one line to the server.
    fn send(&mut self, message: &str) -> Result<()>;

    /// Shut the endpoint down for good.
    fn quit(&mut self) -> Result<()> {
        self.disconnect()
    }
}

/// One downstream connection held by a server endpoint.
pub trait ConnectionHandle {
    /// Stable identifier of the connection.
    fn id(&self) -> String;

    /// Close the connection. Closing twice is harmless.
    fn close(&self) -> Result<()>;
}

/// Endpoint that accepts clients and fans messages out to them.
pub trait ServerEndpoint: Endpoint {
    /// Start accepting connections on the configured port.
    fn listen(&mut self) -> Result<()>;

    /// Stop accepting connections. Open connections stay up.
    fn stop_listening(&mut self) -> Result<()>;

    /// Stop listening and drop every open connection.
    fn close(&mut self) -> Result<()>;

    /// Whether the endpoint is accepting connections right now.
    fn is_listening(&self) -> bool;

    /// Send one line to every connected client.
    fn broadcast(&mut self, message: &str) -> Result<()>;

    /// Snapshot of the currently open connections.
    fn active_connections(&self) -> Vec<Box<dyn ConnectionHandle>>;
}
