//! Pre-admission prompts.

use burrow_protocol::{text, validate_nickname, validate_room_name};
use burrow_transport::{Connection, TransportError};

use crate::SessionError;

/// Prompts until the player offers a valid nickname.
///
/// Invalid answers get an `err --` line and the prompt again. Whether the
/// nickname is free in the chosen room is decided later, at admission.
pub async fn ask_nickname<C: Connection>(conn: &C) -> Result<String, SessionError> {
    loop {
        let answer = answer(conn, text::NICKNAME_PROMPT).await?;
        match validate_nickname(&answer) {
            Ok(nickname) => return Ok(nickname),
            Err(e) => {
                tracing::debug!(conn_id = %conn.id(), error = %e, "nickname refused");
                conn.write(text::INVALID_NICKNAME).await?;
            }
        }
    }
}

/// Prompts until the player names a room.
pub async fn ask_room_name<C: Connection>(conn: &C) -> Result<String, SessionError> {
    loop {
        let answer = answer(conn, text::ROOM_PROMPT).await?;
        match validate_room_name(&answer) {
            Ok(room) => return Ok(room),
            Err(e) => {
                tracing::debug!(conn_id = %conn.id(), error = %e, "room name refused");
                conn.write(text::INVALID_ROOM_NAME).await?;
            }
        }
    }
}

/// An overlong answer is treated as an empty one, so it gets re-prompted.
async fn answer<C: Connection>(conn: &C, question: &str) -> Result<String, SessionError> {
    match conn.prompt(question).await {
        Err(e @ TransportError::LineTooLong(_)) => {
            tracing::debug!(conn_id = %conn.id(), error = %e, "answer refused");
            Ok(String::new())
        }
        other => Ok(other?),
    }
}
