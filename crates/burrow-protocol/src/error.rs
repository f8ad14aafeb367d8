//! Error types for the protocol layer.

/// Errors that can occur while interpreting client text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The nickname is empty, contains non-word characters, or is
    /// reserved for the non-player character.
    #[error("invalid nickname: {0:?}")]
    InvalidNickname(String),

    /// The room name is empty.
    #[error("invalid room name: {0:?}")]
    InvalidRoomName(String),
}
