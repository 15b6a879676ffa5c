//! TCP server endpoint.
//!
//! Accepts clients, tracks one task per connection, and relays each client
//! line to everyone as `<login id>> <line>`.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, OwnedSemaphorePermit, RwLock, Semaphore};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{ConnectionHandle, Endpoint, ServerEndpoint};
use crate::console::{parse_line, ConsoleInput, DisplaySink};
use crate::{ChatError, Result};

/// Shown on the server console when a peer connects.
pub const CLIENT_CONNECTED_MESSAGE: &str = "A new client has connected to the server.";

/// Sent to a peer that announces a login twice.
pub const ALREADY_LOGGED_IN_MESSAGE: &str = "ERROR: Already logged in.";

/// Name used for peers that have not sent `#login`.
pub const ANONYMOUS: &str = "anonymous";

enum Outbound {
    Line(String),
    Close,
}

/// Handle to one connected client.
#[derive(Clone)]
pub struct TcpConnection {
    id: Uuid,
    peer_addr: SocketAddr,
    outbound: mpsc::UnboundedSender<Outbound>,
}

impl TcpConnection {
    /// Remote address of the client.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    fn send_line(&self, text: &str) {
        // The task may already be gone; it removes itself from the registry.
        let _ = self.outbound.send(Outbound::Line(text.to_string()));
    }
}

impl ConnectionHandle for TcpConnection {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn close(&self) -> Result<()> {
        let _ = self.outbound.send(Outbound::Close);
        Ok(())
    }
}

/// State shared between the server and its connection tasks.
struct Hub {
    display: Arc<dyn DisplaySink>,
    connections: RwLock<HashMap<Uuid, TcpConnection>>,
}

impl Hub {
    async fn broadcast(&self, text: &str) {
        for connection in self.connections.read().await.values() {
            connection.send_line(text);
        }
    }
}

/// Chat server speaking newline-terminated lines over TCP.
pub struct TcpChatServer {
    host: String,
    port: u16,
    max_connections: usize,
    // Shared across restarts so clients kept through `stop_listening` still count.
    slots: Arc<Semaphore>,
    runtime: Runtime,
    hub: Arc<Hub>,
    listening: Arc<AtomicBool>,
    acceptor: Option<JoinHandle<()>>,
}

impl TcpChatServer {
    /// Create a server that will bind `host:port` on `listen`.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        max_connections: usize,
        display: Arc<dyn DisplaySink>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("chat-server-io")
            .enable_all()
            .build()?;

        Ok(Self {
            host: host.into(),
            port,
            max_connections,
            slots: Arc::new(Semaphore::new(max_connections)),
            runtime,
            hub: Arc::new(Hub {
                display,
                connections: RwLock::new(HashMap::new()),
            }),
            listening: Arc::new(AtomicBool::new(false)),
            acceptor: None,
        })
    }

    /// Get the maximum number of connections allowed.
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Get the number of open connections.
    pub fn connection_count(&self) -> usize {
        self.hub.connections.blocking_read().len()
    }
}

impl Endpoint for TcpChatServer {
    fn host(&self) -> &str {
        &self.host
    }

    fn set_host(&mut self, host: &str) {
        self.host = host.to_string();
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn set_port(&mut self, port: u16) {
        self.port = port;
    }
}

impl ServerEndpoint for TcpChatServer {
    fn listen(&mut self) -> Result<()> {
        if self.is_listening() {
            return Ok(());
        }

        let addr = format!("{}:{}", self.host, self.port);
        let listener = self
            .runtime
            .block_on(TcpListener::bind(&addr))
            .map_err(|e| ChatError::Connection(format!("{addr}: {e}")))?;
        let local_addr = listener.local_addr()?;
        // Binding port 0 picks a free port; report the real one.
        self.port = local_addr.port();

        self.acceptor = Some(self.runtime.spawn(accept_loop(
            listener,
            Arc::clone(&self.slots),
            Arc::clone(&self.hub),
        )));
        self.listening.store(true, Ordering::SeqCst);

        info!("Chat server listening on {}", local_addr);
        Ok(())
    }

    fn stop_listening(&mut self) -> Result<()> {
        if let Some(acceptor) = self.acceptor.take() {
            acceptor.abort();
            // Wait for the listener to be dropped so the port is free again.
            let _ = self.runtime.block_on(acceptor);
            info!("Chat server stopped listening on port {}", self.port);
        }
        self.listening.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.stop_listening()?;
        let connections = self.active_connections();
        for connection in &connections {
            connection.close()?;
        }
        info!("Chat server closed {} connection(s)", connections.len());
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    fn broadcast(&mut self, message: &str) -> Result<()> {
        for connection in self.hub.connections.blocking_read().values() {
            connection.send_line(message);
        }
        Ok(())
    }

    fn active_connections(&self) -> Vec<Box<dyn ConnectionHandle>> {
        self.hub
            .connections
            .blocking_read()
            .values()
            .cloned()
            .map(|connection| Box::new(connection) as Box<dyn ConnectionHandle>)
            .collect()
    }
}

impl Drop for TcpChatServer {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close server on drop: {}", e);
        }
    }
}

async fn accept_loop(listener: TcpListener, semaphore: Arc<Semaphore>, hub: Arc<Hub>) {
    loop {
        // Wait for a free slot before accepting.
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };

        match listener.accept().await {
            Ok((stream, addr)) => {
                debug!("Accepted connection from {}", addr);
                tokio::spawn(serve_connection(stream, addr, Arc::clone(&hub), permit));
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    hub: Arc<Hub>,
    _permit: OwnedSemaphorePermit,
) {
    let id = Uuid::new_v4();
    let (tx, mut rx) = mpsc::unbounded_channel();
    hub.connections.write().await.insert(
        id,
        TcpConnection {
            id,
            peer_addr,
            outbound: tx,
        },
    );
    info!(%id, %peer_addr, "client connected");
    hub.display.show(CLIENT_CONNECTED_MESSAGE);

    let (read_half, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut login_id: Option<String> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_client_line(&hub, &mut login_id, &line, &mut writer).await {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(%id, "Read from client failed: {}", e);
                    break;
                }
            },
            outbound = rx.recv() => match outbound {
                Some(Outbound::Line(text)) => {
                    if let Err(e) = write_line(&mut writer, &text).await {
                        warn!(%id, "Write to client failed: {}", e);
                        break;
                    }
                }
                Some(Outbound::Close) | None => break,
            },
        }
    }

    hub.connections.write().await.remove(&id);
    let _ = writer.shutdown().await;

    let name = login_id.as_deref().unwrap_or(ANONYMOUS);
    info!(%id, %peer_addr, login_id = %name, "client disconnected");
    hub.display.show(&format!("{name} has disconnected."));
}

/// Handle one line from a client. Returns false when the connection must close.
async fn handle_client_line(
    hub: &Hub,
    login_id: &mut Option<String>,
    line: &str,
    writer: &mut OwnedWriteHalf,
) -> bool {
    let sender = login_id.as_deref().unwrap_or(ANONYMOUS).to_string();
    hub.display
        .show(&format!("Message received: {line} from {sender}"));

    if let ConsoleInput::Command(command) = parse_line(line) {
        if command.name == "login" {
            if login_id.is_some() {
                let _ = write_line(writer, ALREADY_LOGGED_IN_MESSAGE).await;
                return false;
            }
            let Some(id) = command.args.first() else {
                let _ = write_line(writer, "ERROR: No login ID specified.").await;
                return false;
            };
            *login_id = Some(id.clone());
            let notice = format!("{id} has logged on.");
            hub.display.show(&notice);
            hub.broadcast(&notice).await;
            return true;
        }
    }

    hub.broadcast(&format!("{sender}> {line}")).await;
    true
}

async fn write_line(writer: &mut OwnedWriteHalf, text: &str) -> std::io::Result<()> {
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}
