//! Test helpers for console tests.
//!
//! Provides scripted endpoints that record every mutating call, a display
//! sink that records every line, and console builders for both roles.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use simplechat::console::format_line;
use simplechat::{
    ChatError, ClientConsole, ClientEndpoint, ConnectionHandle, DisplaySink, Endpoint, Result,
    ServerConsole, ServerEndpoint, Session,
};

/// Default timeout for network test operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Display sink that keeps every line it was asked to show.
#[derive(Default)]
pub struct RecordingDisplay {
    lines: Mutex<Vec<String>>,
}

impl RecordingDisplay {
    /// Lines as passed to `show`.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Lines as the stdout sink would print them.
    pub fn output(&self) -> Vec<String> {
        self.lines().iter().map(|line| format_line(line)).collect()
    }

    /// Whether some line equals `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|line| line == text)
    }

    /// Forget everything shown so far.
    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl DisplaySink for RecordingDisplay {
    fn show(&self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}

/// Mutating endpoint call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect,
    Disconnect,
    Send(String),
    SetHost(String),
    SetPort(u16),
    Listen,
    StopListening,
    Close,
    Broadcast(String),
    CloseConnection(String),
}

/// Shared state of a [`MockClient`].
#[derive(Debug, Default)]
pub struct ClientState {
    pub connected: bool,
    pub fail_connect: bool,
    pub calls: Vec<Call>,
}

/// Client endpoint that records calls instead of touching the network.
pub struct MockClient {
    host: String,
    port: u16,
    state: Rc<RefCell<ClientState>>,
}

impl Endpoint for MockClient {
    fn host(&self) -> &str {
        &self.host
    }

    fn set_host(&mut self, host: &str) {
        self.state.borrow_mut().calls.push(Call::SetHost(host.to_string()));
        self.host = host.to_string();
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_port(&mut self, port: u16) {
        self.state.borrow_mut().calls.push(Call::SetPort(port));
        self.port = port;
    }
}

impl ClientEndpoint for MockClient {
    fn connect(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Connect);
        if state.fail_connect {
            return Err(ChatError::Connection("refused".to_string()));
        }
        state.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Disconnect);
        state.connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    fn send(&mut self, message: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Send(message.to_string()));
        if !state.connected {
            return Err(ChatError::NotConnected);
        }
        Ok(())
    }
}

/// Shared state of a [`MockServer`].
#[derive(Debug, Default)]
pub struct ServerState {
    pub listening: bool,
    pub fail_listen: bool,
    pub connections: Vec<String>,
    pub calls: Vec<Call>,
}

/// Server endpoint that records calls instead of touching the network.
pub struct MockServer {
    host: String,
    port: u16,
    state: Rc<RefCell<ServerState>>,
}

struct MockConnection {
    id: String,
    state: Rc<RefCell<ServerState>>,
}

impl ConnectionHandle for MockConnection {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn close(&self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::CloseConnection(self.id.clone()));
        state.connections.retain(|id| id != &self.id);
        Ok(())
    }
}

impl Endpoint for MockServer {
    fn host(&self) -> &str {
        &self.host
    }

    fn set_host(&mut self, host: &str) {
        self.state.borrow_mut().calls.push(Call::SetHost(host.to_string()));
        self.host = host.to_string();
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_port(&mut self, port: u16) {
        self.state.borrow_mut().calls.push(Call::SetPort(port));
        self.port = port;
    }
}

impl ServerEndpoint for MockServer {
    fn listen(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Listen);
        if state.fail_listen {
            return Err(ChatError::Connection("address in use".to_string()));
        }
        state.listening = true;
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::StopListening);
        state.listening = false;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Close);
        state.listening = false;
        state.connections.clear();
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    fn broadcast(&mut self, message: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .calls
            .push(Call::Broadcast(message.to_string()));
        Ok(())
    }

    fn active_connections(&self) -> Vec<Box<dyn ConnectionHandle>> {
        self.state
            .borrow()
            .connections
            .iter()
            .map(|id| {
                Box::new(MockConnection {
                    id: id.clone(),
                    state: Rc::clone(&self.state),
                }) as Box<dyn ConnectionHandle>
            })
            .collect()
    }
}

/// Client console over a [`MockClient`] for `alice@localhost:5555`.
pub fn client_console(
    connected: bool,
) -> (ClientConsole, Rc<RefCell<ClientState>>, Arc<RecordingDisplay>) {
    let state = Rc::new(RefCell::new(ClientState {
        connected,
        ..ClientState::default()
    }));
    let endpoint = MockClient {
        host: "localhost".to_string(),
        port: 5555,
        state: Rc::clone(&state),
    };
    let display = Arc::new(RecordingDisplay::default());
    let console = ClientConsole::new(
        Session::client("alice", "localhost", 5555),
        Box::new(endpoint),
        Arc::clone(&display) as Arc<dyn DisplaySink>,
    );
    (console, state, display)
}

/// Server console over a [`MockServer`] on port 5555.
pub fn server_console(
    listening: bool,
    connections: &[&str],
) -> (ServerConsole, Rc<RefCell<ServerState>>, Arc<RecordingDisplay>) {
    let state = Rc::new(RefCell::new(ServerState {
        listening,
        connections: connections.iter().map(|id| id.to_string()).collect(),
        ..ServerState::default()
    }));
    let endpoint = MockServer {
        host: "0.0.0.0".to_string(),
        port: 5555,
        state: Rc::clone(&state),
    };
    let display = Arc::new(RecordingDisplay::default());
    let console = ServerConsole::new(
        Session::server("0.0.0.0", 5555),
        Box::new(endpoint),
        Arc::clone(&display) as Arc<dyn DisplaySink>,
    );
    (console, state, display)
}

/// Poll `condition` until it holds or [`DEFAULT_TIMEOUT`] passes.
pub fn wait_until<F: FnMut() -> bool>(mut condition: F) -> bool {
    let deadline = Instant::now() + DEFAULT_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    condition()
}
