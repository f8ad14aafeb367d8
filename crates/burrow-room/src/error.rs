//! Error types for the room layer.

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The room already has its full roster, or its game has started.
    #[error("room {0} is full")]
    RoomFull(String),

    /// Another member of the room already uses this nickname.
    #[error("nickname {nickname} already taken in room {room}")]
    NicknameTaken { nickname: String, room: String },

    /// The room's actor has stopped (the game ended or everyone left).
    #[error("room {0} is unavailable")]
    Unavailable(String),

    /// The lobby actor has stopped.
    #[error("lobby is unavailable")]
    LobbyUnavailable,

    /// The room configuration cannot run a game.
    #[error("invalid room config: {0}")]
    InvalidConfig(String),
}
