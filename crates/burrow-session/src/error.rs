//! Error types for the session layer.

use burrow_room::RoomError;
use burrow_transport::TransportError;

/// Errors that end a session before or during admission.
///
/// Once a player is in a room, nothing is reported as an error: the
/// session ends with a [`SessionEnd`](crate::SessionEnd) instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The connection failed (or the player hung up) while negotiating.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The lobby or the room could not be reached.
    #[error("room error: {0}")]
    Room(#[from] RoomError),

    /// The room turned the player away (full or already running).
    #[error("rejected from room {room}: {source}")]
    Rejected { room: String, source: RoomError },
}
