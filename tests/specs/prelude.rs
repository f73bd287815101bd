//! Shared helpers for channel specs

#![allow(dead_code)]

pub use notichan_adapters::{HttpTransport, TracedTransport};
pub use notichan_core::{
    subscriber, Channel, ChannelConfig, ChannelError, Notification, NotificationReceiver,
    ALL_EVENTS_KEY, ERROR_KEY,
};
pub use serde_json::json;
pub use std::time::Duration;

use similar_asserts::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

pub const WAIT: Duration = Duration::from_secs(5);
pub const QUIET: Duration = Duration::from_millis(150);

pub type HttpChannel = Channel<TracedTransport<HttpTransport>>;

enum Command {
    Send(String),
    HangUp,
}

/// Something the server observed
#[derive(Debug, PartialEq)]
pub enum Seen {
    Request(String),
    Disconnected,
}

/// Local `text/event-stream` server driven by the test.
///
/// Connections are served one at a time; commands go to whichever
/// connection is current and queue up while none is.
pub struct StreamServer {
    pub api_root: String,
    commands: mpsc::UnboundedSender<Command>,
    seen: mpsc::UnboundedReceiver<Seen>,
}

impl StreamServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_root = format!("http://{}/api/v1", listener.local_addr().unwrap());
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (seen_tx, seen) = mpsc::unbounded_channel();

        tokio::spawn(serve(listener, command_rx, seen_tx));

        Self {
            api_root,
            commands,
            seen,
        }
    }

    /// Write raw event-stream text
    pub fn send(&self, raw: impl Into<String>) {
        let _ = self.commands.send(Command::Send(raw.into()));
    }

    /// Write one `data:` frame
    pub fn send_data(&self, payload: impl AsRef<str>) {
        self.send(format!("data: {}\n\n", payload.as_ref()));
    }

    /// End the current response
    pub fn hang_up(&self) {
        let _ = self.commands.send(Command::HangUp);
    }

    /// Request head of the next connection
    pub async fn next_request(&mut self) -> String {
        match self.next_seen().await {
            Seen::Request(head) => head,
            other => panic!("expected request, got {:?}", other),
        }
    }

    /// Wait for the client to drop the current connection
    pub async fn disconnected(&mut self) {
        assert_eq!(self.next_seen().await, Seen::Disconnected);
    }

    /// Assert nothing new reaches the server for a short while
    pub async fn stays_idle(&mut self) {
        let result = tokio::time::timeout(QUIET, self.seen.recv()).await;
        assert!(result.is_err(), "server saw {:?}", result);
    }

    async fn next_seen(&mut self) -> Seen {
        tokio::time::timeout(WAIT, self.seen.recv())
            .await
            .expect("timed out waiting on server")
            .expect("server task ended")
    }
}

async fn serve(
    listener: TcpListener,
    mut commands: mpsc::UnboundedReceiver<Command>,
    seen: mpsc::UnboundedSender<Seen>,
) {
    while let Ok((socket, _)) = listener.accept().await {
        serve_connection(socket, &mut commands, &seen).await;
    }
}

async fn serve_connection(
    mut socket: TcpStream,
    commands: &mut mpsc::UnboundedReceiver<Command>,
    seen: &mpsc::UnboundedSender<Seen>,
) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    let _ = seen.send(Seen::Request(String::from_utf8_lossy(&head).to_string()));

    let headers = "HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: close\r\n\r\n";
    if socket.write_all(headers.as_bytes()).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Send(raw)) => {
                    if socket.write_all(raw.as_bytes()).await.is_err() {
                        let _ = seen.send(Seen::Disconnected);
                        return;
                    }
                }
                Some(Command::HangUp) | None => {
                    let _ = socket.shutdown().await;
                    return;
                }
            },
            read = socket.read(&mut buf) => {
                if matches!(read, Ok(0) | Err(_)) {
                    let _ = seen.send(Seen::Disconnected);
                    return;
                }
            }
        }
    }
}

/// Channel over the traced HTTP transport pointed at `server`
pub fn channel_for(server: &StreamServer, config: ChannelConfig) -> HttpChannel {
    Channel::new(
        config,
        server.api_root.clone(),
        TracedTransport::new(HttpTransport::new()),
    )
}

/// Next notification, failing the test after [`WAIT`]
pub async fn recv(rx: &mut NotificationReceiver) -> Notification {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for notification")
        .expect("subscription dropped")
}

/// Assert no notification arrives for a short while
pub async fn stays_quiet(rx: &mut NotificationReceiver) {
    let result = tokio::time::timeout(QUIET, rx.recv()).await;
    assert!(result.is_err(), "unexpected notification: {:?}", result);
}
