//! Transport abstraction layer for Burrow.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the byte stream a player talks through. Burrow speaks a line protocol,
//! so a connection reads whole lines and writes flushed text.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`,
//!   one text frame per line

mod error;
mod tcp;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
pub use tcp::{TcpConnection, TcpTransport};
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Longest line a connection accepts, in bytes, without its `\n`.
///
/// Longer lines are dropped whole and reported as
/// [`TransportError::LineTooLong`].
pub const MAX_LINE_LEN: usize = 4096;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;

    /// Waits for and accepts the next incoming connection.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, TransportError>> + Send;

    /// Returns the address the transport is listening on.
    fn local_addr(&self) -> std::io::Result<SocketAddr>;
}

/// A single bidirectional line stream.
///
/// Reads and writes may run concurrently from different tasks: a session
/// keeps one task parked in [`read_line`](Self::read_line) while another
/// writes broadcasts.
pub trait Connection: Send + Sync + 'static {
    /// Reads the next line, without its line terminator.
    ///
    /// Returns `Ok(None)` when the peer closed the stream. Bytes that are
    /// not UTF-8 are replaced with U+FFFD rather than failing the read.
    fn read_line(
        &self,
    ) -> impl Future<Output = Result<Option<String>, TransportError>> + Send;

    /// Writes `text` verbatim and flushes it.
    fn write(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Closes the connection. Further writes fail.
    fn close(&self) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;

    /// Writes `question` and waits for the answer line.
    ///
    /// A closed stream is reported as [`TransportError::ConnectionClosed`].
    fn prompt(
        &self,
        question: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        async move {
            self.write(question).await?;
            self.read_line().await?.ok_or_else(|| {
                TransportError::ConnectionClosed(format!(
                    "{} closed while prompting",
                    self.id()
                ))
            })
        }
    }
}

/// Allocates the next process-wide connection ID.
pub(crate) fn next_connection_id() -> ConnectionId {
    ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
}

/// Strips a trailing `\n` or `\r\n`.
pub(crate) fn trim_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
