//! `BurrowServer` builder and server loop.
//!
//! This is the entry point for running a Burrow game server. It ties
//! together the layers: transport → session → room.

use burrow_room::{LobbyHandle, RoomConfig};
use burrow_transport::{TcpTransport, Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{BurrowConfig, BurrowError};

/// Builder for configuring and starting a Burrow server.
///
/// # Example
///
/// ```rust,no_run
/// use burrow::prelude::*;
///
/// # async fn start() -> Result<(), BurrowError> {
/// let server = BurrowServer::builder()
///     .bind("0.0.0.0:7777")
///     .room_config(RoomConfig { seed: Some(42), ..RoomConfig::default() })
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct BurrowServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
}

impl BurrowServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        let defaults = BurrowConfig::default();
        Self {
            bind_addr: defaults.bind,
            room_config: defaults.room,
        }
    }

    /// Takes the bind address and room settings from `config`.
    pub fn config(self, config: &BurrowConfig) -> Self {
        self.bind(&config.bind).room_config(config.room.clone())
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds a TCP listener and starts the lobby.
    pub async fn build(self) -> Result<BurrowServer<TcpTransport>, BurrowError> {
        let transport = TcpTransport::bind(&self.bind_addr).await?;
        self.build_with(transport)
    }

    /// Binds a WebSocket listener and starts the lobby.
    pub async fn build_websocket(
        self,
    ) -> Result<BurrowServer<WebSocketTransport>, BurrowError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        self.build_with(transport)
    }

    /// Starts the lobby and serves connections from an already bound
    /// transport.
    pub fn build_with<T: Transport>(
        self,
        transport: T,
    ) -> Result<BurrowServer<T>, BurrowError> {
        let outbox_size = self.room_config.channel_size;
        let lobby = LobbyHandle::spawn(self.room_config)?;
        Ok(BurrowServer {
            transport,
            lobby,
            outbox_size,
        })
    }
}

impl Default for BurrowServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A Burrow game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct BurrowServer<T: Transport> {
    transport: T,
    lobby: LobbyHandle,
    outbox_size: usize,
}

impl BurrowServer<TcpTransport> {
    /// Creates a new builder.
    pub fn builder() -> BurrowServerBuilder {
        BurrowServerBuilder::new()
    }
}

impl<T: Transport> BurrowServer<T> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Returns the lobby every connection is matched through.
    pub fn lobby(&self) -> &LobbyHandle {
        &self.lobby
    }

    /// Runs the server accept loop.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated; a failed accept is logged and skipped.
    pub async fn run(mut self) -> Result<(), BurrowError> {
        match self.transport.local_addr() {
            Ok(addr) => tracing::info!(%addr, "Burrow server running"),
            Err(_) => tracing::info!("Burrow server running"),
        }

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let lobby = self.lobby.clone();
                    let outbox_size = self.outbox_size;
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_connection(conn, lobby, outbox_size).await
                        {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
