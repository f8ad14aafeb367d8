//! The lobby: the process-wide room-name → room registry.
//!
//! The lobby is an actor like the rooms it creates. Owning the map inside a
//! single task makes "look up or create" atomic per name without a lock:
//! two sessions naming the same new room always end up in the same actor.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};

use crate::room::spawn_room;
use crate::{MemberSender, RoomConfig, RoomError, RoomHandle};

/// Commands understood by the lobby actor.
enum LobbyCommand {
    FindOrCreate {
        name: String,
        reply: oneshot::Sender<RoomHandle>,
    },
    RoomCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to the lobby actor.
#[derive(Clone)]
pub struct LobbyHandle {
    sender: mpsc::Sender<LobbyCommand>,
}

impl LobbyHandle {
    /// Spawns the lobby actor. Every room it creates uses `config`.
    pub fn spawn(config: RoomConfig) -> Result<Self, RoomError> {
        config.validate()?;
        let (tx, rx) = mpsc::channel(config.channel_size);
        let lobby = Lobby {
            rooms: HashMap::new(),
            config,
            receiver: rx,
        };
        tokio::spawn(lobby.run());
        Ok(Self { sender: tx })
    }

    /// Returns the live room called `name`, creating it if there is none
    /// (or if the previous one has finished).
    pub async fn find_or_create(
        &self,
        name: &str,
    ) -> Result<RoomHandle, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LobbyCommand::FindOrCreate {
                name: name.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::LobbyUnavailable)?;
        reply_rx.await.map_err(|_| RoomError::LobbyUnavailable)
    }

    /// Routes `nickname` into the room called `room`.
    ///
    /// A full or already started room is a rejection
    /// ([`RoomError::RoomFull`]); a nickname collision is reported as
    /// [`RoomError::NicknameTaken`] so the caller can ask for another one.
    /// If the room finishes between lookup and join, a fresh room under the
    /// same name is tried once.
    pub async fn admit(
        &self,
        room: &str,
        nickname: &str,
        outbox: MemberSender,
    ) -> Result<RoomHandle, RoomError> {
        let mut retried = false;
        loop {
            let handle = self.find_or_create(room).await?;
            match handle.join(nickname, outbox.clone()).await {
                Ok(()) => return Ok(handle),
                Err(RoomError::Unavailable(_)) if !retried => {
                    tracing::debug!(%room, %nickname, "room ended during admission, retrying");
                    retried = true;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Returns the number of rooms whose game is not over yet.
    pub async fn room_count(&self) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(LobbyCommand::RoomCount { reply: reply_tx })
            .await
            .map_err(|_| RoomError::LobbyUnavailable)?;
        reply_rx.await.map_err(|_| RoomError::LobbyUnavailable)
    }
}

/// The internal lobby state. Runs inside a Tokio task.
struct Lobby {
    rooms: HashMap<String, RoomHandle>,
    config: RoomConfig,
    receiver: mpsc::Receiver<LobbyCommand>,
}

impl Lobby {
    async fn run(mut self) {
        tracing::info!("lobby started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LobbyCommand::FindOrCreate { name, reply } => {
                    let handle = self.find_or_create(&name);
                    let _ = reply.send(handle);
                }
                LobbyCommand::RoomCount { reply } => {
                    self.rooms.retain(|_, room| !room.is_finished());
                    let _ = reply.send(self.rooms.len());
                }
            }
        }

        tracing::info!("lobby stopped");
    }

    fn find_or_create(&mut self, name: &str) -> RoomHandle {
        if let Some(room) = self.rooms.get(name) {
            if !room.is_finished() {
                return room.clone();
            }
            tracing::debug!(room = %name, "replacing finished room");
        }

        let room = spawn_room(name, self.config.clone());
        self.rooms.insert(name.to_string(), room.clone());
        tracing::info!(room = %name, "room created");
        room
    }
}
