//! Unified error type for Burrow.

use std::path::PathBuf;

use burrow_protocol::ProtocolError;
use burrow_room::RoomError;
use burrow_session::SessionError;
use burrow_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each layer's variant lets `?` convert
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BurrowError {
    /// A transport-level error (bind, accept, read, write).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (invalid nickname or room name).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session that ended before joining a room.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room-level error (full, unavailable, invalid config).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// The config file could not be read.
    #[error("cannot read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`BurrowConfig`](crate::BurrowConfig).
    #[error("invalid config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}
