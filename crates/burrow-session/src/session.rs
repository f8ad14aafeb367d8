//! A client session: one connected player from prompts to hang-up.
//!
//! After admission the session splits into two tasks sharing the
//! connection. The inbound duty parks in `read_line` and forwards parsed
//! commands to the room; the outbound duty drains the member's outbox and
//! writes it. Whichever stops first ends the session: the other task is
//! aborted and awaited, and only then does the session leave the room and
//! close the connection. Dropping the outbox before leaving means the room
//! can never block on a queue nobody reads.

use std::sync::Arc;

use burrow_protocol::{parse_command, text, Command};
use burrow_room::{LobbyHandle, Outbound, RoomError, RoomHandle};
use burrow_transport::{Connection, TransportError};
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

use crate::{ask_nickname, ask_room_name, SessionError};

/// Default capacity of a member's outbox.
const DEFAULT_OUTBOX_SIZE: usize = 64;

/// Why an admitted session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The player hung up, or reading from them failed.
    ClientLeft,
    /// The room closed the session (the game is over).
    GameOver,
    /// Writing to the player failed.
    WriteFailed,
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClientLeft => write!(f, "client left"),
            Self::GameOver => write!(f, "game over"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

/// A member that made it into a room.
struct Admission {
    nickname: String,
    room: RoomHandle,
    inbox: mpsc::Receiver<Outbound>,
}

/// Drives one connection through negotiation, play and termination.
pub struct ClientSession<C: Connection> {
    conn: Arc<C>,
    lobby: LobbyHandle,
    outbox_size: usize,
}

impl<C: Connection> ClientSession<C> {
    pub fn new(conn: C, lobby: LobbyHandle) -> Self {
        Self {
            conn: Arc::new(conn),
            lobby,
            outbox_size: DEFAULT_OUTBOX_SIZE,
        }
    }

    /// Sets the capacity of the member's outbox. Zero is treated as one.
    pub fn outbox_size(mut self, size: usize) -> Self {
        self.outbox_size = size.max(1);
        self
    }

    /// Runs the session to completion.
    ///
    /// Errors are only returned for sessions that never joined a room; the
    /// connection is closed in every case.
    pub async fn run(self) -> Result<SessionEnd, SessionError> {
        let conn_id = self.conn.id();

        let admission = match self.admit().await {
            Ok(admission) => admission,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "session ended before admission");
                let _ = self.conn.close().await;
                return Err(e);
            }
        };
        let Admission {
            nickname,
            room,
            inbox,
        } = admission;
        tracing::info!(%conn_id, %nickname, room = %room.name(), "session started");

        let mut duties = JoinSet::new();
        duties.spawn(deliver(Arc::clone(&self.conn), inbox));
        duties.spawn(dispatch(Arc::clone(&self.conn), room.clone(), nickname.clone()));

        // The first duty to stop decides why the session ended; the other
        // one is aborted and awaited.
        let end = match duties.join_next().await {
            Some(result) => settle(result),
            None => SessionEnd::ClientLeft,
        };
        duties.shutdown().await;

        // Both duties have stopped here; this runs once per session.
        if let Err(e) = room.leave(&nickname).await {
            tracing::debug!(%conn_id, %nickname, error = %e, "room already gone");
        }
        if let Err(e) = self.conn.close().await {
            tracing::debug!(%conn_id, error = %e, "close failed");
        }
        tracing::info!(%conn_id, %nickname, room = %room.name(), reason = %end, "session closed");
        Ok(end)
    }

    /// Negotiates a nickname and a room, then joins it.
    ///
    /// A nickname collision asks for another nickname and tries the same
    /// room again. A full room is written to the player and ends the
    /// session.
    async fn admit(&self) -> Result<Admission, SessionError> {
        let conn = &*self.conn;
        let mut nickname = ask_nickname(conn).await?;
        let room_name = ask_room_name(conn).await?;

        loop {
            let (outbox, inbox) = mpsc::channel(self.outbox_size);
            match self.lobby.admit(&room_name, &nickname, outbox).await {
                Ok(room) => {
                    return Ok(Admission {
                        nickname,
                        room,
                        inbox,
                    });
                }
                Err(RoomError::NicknameTaken { .. }) => {
                    tracing::debug!(conn_id = %conn.id(), %nickname, room = %room_name, "nickname taken");
                    conn.write(&text::nickname_taken(&nickname)).await?;
                    nickname = ask_nickname(conn).await?;
                }
                Err(e @ RoomError::RoomFull(_)) => {
                    tracing::info!(conn_id = %conn.id(), %nickname, room = %room_name, "room full, rejecting");
                    conn.write(&text::room_full(&room_name)).await?;
                    return Err(SessionError::Rejected {
                        room: room_name,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(conn_id = %conn.id(), room = %room_name, error = %e, "admission failed");
                    conn.write(&text::room_unavailable(&room_name)).await?;
                    return Err(e.into());
                }
            }
        }
    }
}

/// Inbound duty: every line becomes a room command.
///
/// A line over the transport's length limit counts as an invalid command.
async fn dispatch<C: Connection>(conn: Arc<C>, room: RoomHandle, nickname: String) -> SessionEnd {
    loop {
        let command = match conn.read_line().await {
            Ok(Some(line)) => parse_command(&line),
            Ok(None) => {
                tracing::debug!(conn_id = %conn.id(), %nickname, "client closed the stream");
                return SessionEnd::ClientLeft;
            }
            Err(e @ TransportError::LineTooLong(_)) => {
                tracing::debug!(conn_id = %conn.id(), %nickname, error = %e, "line refused");
                Command::Invalid
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn.id(), %nickname, error = %e, "read failed");
                return SessionEnd::ClientLeft;
            }
        };

        if room.command(&nickname, command).await.is_err() {
            return SessionEnd::GameOver;
        }
    }
}

/// Outbound duty: writes the outbox in order until the room says goodbye.
async fn deliver<C: Connection>(conn: Arc<C>, mut inbox: mpsc::Receiver<Outbound>) -> SessionEnd {
    while let Some(event) = inbox.recv().await {
        let line = match event {
            Outbound::Text(line) => line,
            Outbound::FileArrived { file, from } => text::received(&file.filename, &from),
            Outbound::Close => return SessionEnd::GameOver,
        };
        if let Err(e) = conn.write(&line).await {
            tracing::debug!(conn_id = %conn.id(), error = %e, "write failed");
            return SessionEnd::WriteFailed;
        }
    }
    SessionEnd::GameOver
}

fn settle(result: Result<SessionEnd, JoinError>) -> SessionEnd {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "session duty did not finish cleanly");
        SessionEnd::ClientLeft
    })
}
