//! TCP client endpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{ClientEndpoint, Endpoint};
use crate::console::DisplaySink;
use crate::{ChatError, Result};

/// Shown when the server side closes the connection.
pub const SERVER_SHUTDOWN_MESSAGE: &str = "The server has shut down.";

/// Open connection: the write half plus the task reading the other half.
struct Link {
    writer: OwnedWriteHalf,
    reader: JoinHandle<()>,
}

/// Chat client speaking newline-terminated lines over TCP.
///
/// Lines from the server are shown through the display sink as they arrive.
pub struct TcpChatClient {
    host: String,
    port: u16,
    runtime: Runtime,
    display: Arc<dyn DisplaySink>,
    connected: Arc<AtomicBool>,
    link: Option<Link>,
}

impl TcpChatClient {
    /// Create a disconnected client for `host:port`.
    pub fn new(host: impl Into<String>, port: u16, display: Arc<dyn DisplaySink>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("chat-client-io")
            .enable_all()
            .build()?;

        Ok(Self {
            host: host.into(),
            port,
            runtime,
            display,
            connected: Arc::new(AtomicBool::new(false)),
            link: None,
        })
    }

    fn close_link(&mut self) {
        if let Some(link) = self.link.take() {
            let Link { mut writer, reader } = link;
            reader.abort();
            self.runtime.block_on(async {
                // Cancelled is the expected outcome here.
                let _ = reader.await;
                let _ = writer.shutdown().await;
            });
        }
        self.connected.store(false, Ordering::SeqCst);
    }
}

impl Endpoint for TcpChatClient {
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

impl ClientEndpoint for TcpChatClient {
    fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        // A link whose reader saw the server go away is still around.
        self.close_link();

        let addr = format!("{}:{}", self.host, self.port);
        let stream = self
            .runtime
            .block_on(TcpStream::connect(&addr))
            .map_err(|e| ChatError::Connection(format!("{addr}: {e}")))?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY: {}", e);
        }

        let (read_half, writer) = stream.into_split();
        self.connected.store(true, Ordering::SeqCst);
        let reader = self.runtime.spawn(read_from_server(
            read_half,
            Arc::clone(&self.connected),
            Arc::clone(&self.display),
        ));
        self.link = Some(Link { writer, reader });

        info!("Connected to {}", addr);
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        if self.link.is_some() {
            info!("Disconnecting from {}:{}", self.host, self.port);
        }
        self.close_link();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn send(&mut self, message: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(ChatError::NotConnected);
        }
        let Some(link) = self.link.as_mut() else {
            return Err(ChatError::NotConnected);
        };

        let written = self
            .runtime
            .block_on(write_line(&mut link.writer, message));
        if let Err(e) = written {
            warn!("Write to server failed: {}", e);
            self.close_link();
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for TcpChatClient {
    fn drop(&mut self) {
        self.close_link();
    }
}

async fn write_line(writer: &mut OwnedWriteHalf, message: &str) -> std::io::Result<()> {
    writer.write_all(message.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

async fn read_from_server(
    read_half: OwnedReadHalf,
    connected: Arc<AtomicBool>,
    display: Arc<dyn DisplaySink>,
) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => display.show(&line),
            Ok(None) => {
                debug!("Server closed the connection");
                break;
            }
            Err(e) => {
                warn!("Connection to server lost: {}", e);
                break;
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
    display.show(SERVER_SHUTDOWN_MESSAGE);
}
