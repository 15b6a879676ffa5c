//! Per-console configuration edited by operator commands.

/// Which half of the chat system a console drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    /// Connects out to a server.
    Client,
    /// Listens for clients.
    Server,
}

impl RoleKind {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Client => "client",
            RoleKind::Server => "server",
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host, port and identity of one console.
///
/// There is no activity flag here; whether the endpoint is connected or
/// listening is always asked of the endpoint itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    role: RoleKind,
    host: String,
    port: u16,
    login_id: Option<String>,
}

impl Session {
    /// Create a client session.
    pub fn client(login_id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            role: RoleKind::Client,
            host: host.into(),
            port,
            login_id: Some(login_id.into()),
        }
    }

    /// Create a server session.
    pub fn server(host: impl Into<String>, port: u16) -> Self {
        Self {
            role: RoleKind::Server,
            host: host.into(),
            port,
            login_id: None,
        }
    }

    /// Role of the console owning this session.
    pub fn role(&self) -> RoleKind {
        self.role
    }

    /// Configured host.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Login identity announced on connect (client role only).
    pub fn login_id(&self) -> Option<&str> {
        self.login_id.as_deref()
    }

    pub(crate) fn set_host(&mut self, host: impl Into<String>) {
        self.host = host.into();
    }

    pub(crate) fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    pub(crate) fn set_login_id(&mut self, login_id: impl Into<String>) {
        self.login_id = Some(login_id.into());
    }
}
