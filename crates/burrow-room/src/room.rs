//! Room actor: an isolated Tokio task that owns one game.
//!
//! Every piece of mutable game state (roster, inventories, bandwidth,
//! collected pool, done set, status) lives inside [`RoomActor`] and is only
//! touched by its task. Sessions talk to it through a [`RoomHandle`], so two
//! `/send`s racing each other are simply processed one after the other.

use std::collections::HashSet;

use burrow_protocol::{text, Command, File, DONE_TOKEN, ALL, GLENDA};
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot, watch};

use crate::mission::{deal, mission_rng};
use crate::{RoomConfig, RoomError, RoomStatus};

/// What a room delivers to a member's outbound duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Text to write as-is.
    Text(String),
    /// A teammate moved a file into this member's inventory.
    FileArrived { file: File, from: String },
    /// The game is over; flush and hang up.
    Close,
}

/// Channel sender for delivering outbound events to a member.
pub type MemberSender = mpsc::Sender<Outbound>;

/// Events sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a reply channel: the caller
/// sends the event and waits for the answer on it.
pub(crate) enum RoomEvent {
    /// Add a member to the roster.
    Join {
        nickname: String,
        outbox: MemberSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// A member's session ended. Fire-and-forget.
    Leave { nickname: String },

    /// A parsed command typed by a member.
    Command { from: String, command: Command },

    /// Request a read-only copy of the room state.
    Snapshot { reply: oneshot::Sender<RoomSnapshot> },
}

/// A member as seen from outside the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub nickname: String,
    pub bandwidth: i64,
    pub files: Vec<File>,
    pub done: bool,
}

/// A read-only copy of a room's state.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub name: String,
    pub status: RoomStatus,
    pub capacity: usize,
    /// Members in join order.
    pub members: Vec<MemberSnapshot>,
    /// Files delivered to Glenda so far.
    pub collected: Vec<File>,
}

impl RoomSnapshot {
    /// Sum of the secrecy values of the collected files.
    pub fn score(&self) -> i64 {
        self.collected.iter().map(|f| f.secrecy).sum()
    }

    /// Looks up a member by nickname.
    pub fn member(&self, nickname: &str) -> Option<&MemberSnapshot> {
        self.members.iter().find(|m| m.nickname == nickname)
    }
}

/// Handle to a running room actor. Used to send events to it.
///
/// Cheap to clone: a name, an `mpsc::Sender` and a `watch::Receiver` on the
/// room's status. The lobby holds one per room, and every member session
/// holds another.
#[derive(Clone)]
pub struct RoomHandle {
    name: String,
    sender: mpsc::Sender<RoomEvent>,
    status: watch::Receiver<RoomStatus>,
}

impl RoomHandle {
    /// Returns the room's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the room's current lifecycle status.
    pub fn status(&self) -> RoomStatus {
        *self.status.borrow()
    }

    /// Returns `true` once the game is over or the actor has stopped.
    /// A finished room never accepts members again.
    pub fn is_finished(&self) -> bool {
        self.sender.is_closed() || self.status().is_terminal()
    }

    /// Waits until the room reaches `Fail` or `Success` and returns it.
    pub async fn finished(&self) -> Result<RoomStatus, RoomError> {
        let mut status = self.status.clone();
        let reached = status
            .wait_for(|s| s.is_terminal())
            .await
            .map_err(|_| self.unavailable())?;
        Ok(*reached)
    }

    /// Asks the room to admit `nickname`, delivering to `outbox`.
    pub async fn join(
        &self,
        nickname: &str,
        outbox: MemberSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomEvent::Join {
                nickname: nickname.to_string(),
                outbox,
                reply: reply_tx,
            })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())?
    }

    /// Tells the room a member is gone. Does not wait for the room to
    /// process it.
    pub async fn leave(&self, nickname: &str) -> Result<(), RoomError> {
        self.sender
            .send(RoomEvent::Leave {
                nickname: nickname.to_string(),
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Forwards a member's command (fire-and-forget).
    pub async fn command(
        &self,
        from: &str,
        command: Command,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomEvent::Command {
                from: from.to_string(),
                command,
            })
            .await
            .map_err(|_| self.unavailable())
    }

    /// Requests a snapshot of the room.
    pub async fn snapshot(&self) -> Result<RoomSnapshot, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomEvent::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.name.clone())
    }
}

/// One seat at the table.
struct Member {
    nickname: String,
    outbox: MemberSender,
    bandwidth: i64,
    files: Vec<File>,
}

/// The internal room state. Runs inside a Tokio task.
struct RoomActor {
    name: String,
    status: RoomStatus,
    config: RoomConfig,
    /// Join order; dealing and broadcasts iterate in this order.
    members: Vec<Member>,
    done: HashSet<String>,
    collected: Vec<File>,
    rng: StdRng,
    receiver: mpsc::Receiver<RoomEvent>,
    status_tx: watch::Sender<RoomStatus>,
}

impl RoomActor {
    /// Runs the actor loop until the last member leaves, whether the game
    /// is still gathering players or already over. Once over, only leaves
    /// and snapshots are still served.
    async fn run(mut self) {
        tracing::info!(room = %self.name, "room actor started");

        while let Some(event) = self.receiver.recv().await {
            match event {
                RoomEvent::Join {
                    nickname,
                    outbox,
                    reply,
                } => {
                    let result = self.admit(&nickname, outbox);
                    let admitted = result.is_ok();
                    // Reply first: the joining session only starts draining
                    // its outbox once it hears back.
                    let _ = reply.send(result);
                    if admitted {
                        self.announce_join(&nickname).await;
                    }
                }
                RoomEvent::Leave { nickname } => {
                    self.handle_leave(&nickname).await;
                    if self.members.is_empty() {
                        break;
                    }
                }
                RoomEvent::Command { from, command } => {
                    self.handle_command(&from, command).await;
                }
                RoomEvent::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
            }

        }

        tracing::info!(room = %self.name, status = %self.status, "room actor stopped");
    }

    // -- Membership -------------------------------------------------------

    fn admit(
        &mut self,
        nickname: &str,
        outbox: MemberSender,
    ) -> Result<(), RoomError> {
        if !self.status.is_joinable()
            || self.members.len() >= self.config.capacity
        {
            return Err(RoomError::RoomFull(self.name.clone()));
        }
        if self.index_of(nickname).is_some() {
            return Err(RoomError::NicknameTaken {
                nickname: nickname.to_string(),
                room: self.name.clone(),
            });
        }

        self.members.push(Member {
            nickname: nickname.to_string(),
            outbox,
            bandwidth: 0,
            files: Vec::new(),
        });
        tracing::info!(
            room = %self.name,
            %nickname,
            members = self.members.len(),
            "member joined"
        );
        Ok(())
    }

    async fn announce_join(&mut self, nickname: &str) {
        let count = self.members.len();
        let capacity = self.config.capacity;
        self.send_to(nickname, Outbound::Text(text::welcome(&self.name, count, capacity)))
            .await;
        self.broadcast_except(nickname, text::joined(nickname, count, capacity))
            .await;

        if count == capacity {
            self.start().await;
        }
    }

    async fn handle_leave(&mut self, nickname: &str) {
        let Some(idx) = self.index_of(nickname) else {
            tracing::debug!(room = %self.name, %nickname, "leave for non-member, ignoring");
            return;
        };
        self.members.remove(idx);
        self.done.remove(nickname);
        tracing::info!(
            room = %self.name,
            %nickname,
            members = self.members.len(),
            status = %self.status,
            "member left"
        );

        match self.status {
            RoomStatus::Lobby => {
                let msg = text::left(nickname, self.members.len(), self.config.capacity);
                self.broadcast(msg).await;
            }
            RoomStatus::Running => {
                self.finish(RoomStatus::Fail, text::fail_abort(nickname)).await;
            }
            // Sessions hanging up after the ending.
            RoomStatus::Fail | RoomStatus::Success => {}
        }
    }

    // -- Lifecycle --------------------------------------------------------

    /// Lobby → Running: deal bandwidth and files, announce the mission.
    async fn start(&mut self) {
        self.set_status(RoomStatus::Running);

        let shares = deal(&self.config, self.members.len(), &mut self.rng);
        for (member, share) in self.members.iter_mut().zip(shares) {
            member.bandwidth = share.bandwidth;
            member.files = share.files;
        }
        tracing::info!(room = %self.name, members = self.members.len(), "mission started");

        self.broadcast(text::MISSION_START.to_string()).await;
        for member in &self.members {
            let msg = text::briefing(member.bandwidth, member.files.len());
            let _ = member.outbox.send(Outbound::Text(msg)).await;
        }
    }

    /// Running → Fail/Success: tell everyone, then hang up on them.
    async fn finish(&mut self, status: RoomStatus, narrative: String) {
        if !self.status.can_transition_to(status) {
            tracing::warn!(
                room = %self.name,
                from = %self.status,
                to = %status,
                "ignoring illegal transition"
            );
            return;
        }
        self.set_status(status);
        tracing::info!(room = %self.name, %status, "game over");

        for member in &self.members {
            let _ = member.outbox.send(Outbound::Text(narrative.clone())).await;
            let _ = member.outbox.send(Outbound::Close).await;
        }
    }

    fn check_success(&self) -> bool {
        !self.members.is_empty()
            && self.members.iter().all(|m| self.done.contains(&m.nickname))
    }

    // -- Commands ---------------------------------------------------------

    async fn handle_command(&mut self, from: &str, command: Command) {
        if !self.status.is_running() {
            tracing::debug!(
                room = %self.name,
                %from,
                command = command.name(),
                status = %self.status,
                "discarding command outside a running game"
            );
            return;
        }
        let Some(idx) = self.index_of(from) else {
            tracing::warn!(room = %self.name, %from, "command from non-member, ignoring");
            return;
        };
        tracing::debug!(room = %self.name, %from, command = command.name(), "command");

        match command {
            Command::Help => self.reply(idx, text::HELP.to_string()).await,
            Command::List => {
                let member = &self.members[idx];
                let msg = text::list(member.bandwidth, &member.files);
                self.reply(idx, msg).await;
            }
            Command::Look => {
                let msg = text::look(self.members.iter().map(|m| m.nickname.as_str()));
                self.reply(idx, msg).await;
            }
            Command::Msg { to, text: body } => {
                self.route_message(idx, &to, &body).await;
            }
            Command::Send { to, filename } => {
                self.route_file(idx, &to, &filename).await;
            }
            Command::Usage(synopsis) => self.reply(idx, text::usage(synopsis)).await,
            Command::Invalid => self.reply(idx, text::INVALID_COMMAND.to_string()).await,
        }
    }

    async fn route_message(&mut self, idx: usize, to: &str, body: &str) {
        let from = self.members[idx].nickname.clone();

        if to.eq_ignore_ascii_case(GLENDA) {
            if body != DONE_TOKEN {
                self.reply(idx, text::GLENDA_BRIEFING.to_string()).await;
                return;
            }
            if self.done.insert(from.clone()) {
                tracing::info!(room = %self.name, nickname = %from, "member done");
                self.broadcast(text::member_done(&from)).await;
            }
            if self.check_success() {
                let msg = text::success(self.score(), self.collected.len());
                self.finish(RoomStatus::Success, msg).await;
            }
        } else if to.eq_ignore_ascii_case(ALL) {
            self.broadcast(text::broadcast(&from, body)).await;
        } else if self.index_of(to).is_some() {
            self.send_to(to, Outbound::Text(text::direct(&from, body))).await;
        } else {
            self.reply(idx, text::no_such_member(to)).await;
        }
    }

    async fn route_file(&mut self, idx: usize, to: &str, filename: &str) {
        let from = self.members[idx].nickname.clone();

        if self.done.contains(&from) {
            self.reply(idx, text::ALREADY_DONE.to_string()).await;
            return;
        }
        let Some(file_idx) = self.members[idx]
            .files
            .iter()
            .position(|f| f.filename == filename)
        else {
            self.reply(idx, text::no_such_file(filename)).await;
            return;
        };

        if to.eq_ignore_ascii_case(GLENDA) {
            let file = self.members[idx].files.remove(file_idx);
            let member = &mut self.members[idx];
            member.bandwidth -= file.size;
            let remaining = member.bandwidth;
            tracing::info!(
                room = %self.name,
                nickname = %from,
                file = %file,
                remaining,
                "file delivered to glenda"
            );
            self.collected.push(file);

            if remaining < 0 {
                self.finish(RoomStatus::Fail, text::FAIL_BANDWIDTH.to_string())
                    .await;
            } else {
                self.reply(idx, text::sent(filename, remaining)).await;
            }
        } else if let Some(target) = self.index_of(to) {
            let file = self.members[idx].files.remove(file_idx);
            tracing::debug!(room = %self.name, %from, %to, file = %file, "file moved");
            self.members[target].files.push(file.clone());

            let bandwidth = self.members[idx].bandwidth;
            self.reply(idx, text::sent(filename, bandwidth)).await;
            let arrival = Outbound::FileArrived { file, from };
            let _ = self.members[target].outbox.send(arrival).await;
        } else {
            self.reply(idx, text::no_such_member(to)).await;
        }
    }

    // -- Delivery ---------------------------------------------------------

    /// Sends text to the member at `idx`. Silently drops if the member's
    /// outbound duty is gone.
    async fn reply(&self, idx: usize, msg: String) {
        let _ = self.members[idx].outbox.send(Outbound::Text(msg)).await;
    }

    async fn send_to(&self, nickname: &str, msg: Outbound) {
        if let Some(idx) = self.index_of(nickname) {
            let _ = self.members[idx].outbox.send(msg).await;
        }
    }

    /// Delivers `msg` to every member before returning, so the whole room
    /// sees broadcasts in the same order.
    async fn broadcast(&self, msg: String) {
        for member in &self.members {
            let _ = member.outbox.send(Outbound::Text(msg.clone())).await;
        }
    }

    async fn broadcast_except(&self, excluded: &str, msg: String) {
        for member in self.members.iter().filter(|m| m.nickname != excluded) {
            let _ = member.outbox.send(Outbound::Text(msg.clone())).await;
        }
    }

    fn set_status(&mut self, status: RoomStatus) {
        debug_assert!(self.status.can_transition_to(status));
        self.status = status;
        self.status_tx.send_replace(status);
    }

    // -- Queries ----------------------------------------------------------

    fn index_of(&self, nickname: &str) -> Option<usize> {
        self.members.iter().position(|m| m.nickname == nickname)
    }

    fn score(&self) -> i64 {
        self.collected.iter().map(|f| f.secrecy).sum()
    }

    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            name: self.name.clone(),
            status: self.status,
            capacity: self.config.capacity,
            members: self
                .members
                .iter()
                .map(|m| MemberSnapshot {
                    nickname: m.nickname.clone(),
                    bandwidth: m.bandwidth,
                    files: m.files.clone(),
                    done: self.done.contains(&m.nickname),
                })
                .collect(),
            collected: self.collected.clone(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `config.channel_size` bounds the event queue: when it fills up, senders
/// wait.
pub(crate) fn spawn_room(name: &str, config: RoomConfig) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));
    let (status_tx, status_rx) = watch::channel(RoomStatus::Lobby);

    let actor = RoomActor {
        name: name.to_string(),
        status: RoomStatus::Lobby,
        rng: mission_rng(config.seed),
        config,
        members: Vec::new(),
        done: HashSet::new(),
        collected: Vec::new(),
        receiver: rx,
        status_tx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        name: name.to_string(),
        sender: tx,
        status: status_rx,
    }
}
