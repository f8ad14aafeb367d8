//! Room lifecycle and matchmaking for Burrow.
//!
//! Each game room runs as an isolated Tokio task (actor model) that owns
//! its roster, the members' inventories and bandwidth, the collected file
//! pool and the lifecycle status. The lobby is a second kind of actor that
//! owns the room-name → room mapping. Nothing here is shared behind a lock:
//! sessions send events and read replies.
//!
//! # Key types
//!
//! - [`LobbyHandle`]: finds or creates rooms by name, admits members
//! - [`RoomHandle`]: send events to a running room actor
//! - [`RoomStatus`]: lifecycle state machine
//! - [`RoomConfig`]: capacity, bandwidth list and file table
//! - [`Outbound`]: what a room delivers to a member's outbox

mod config;
mod error;
mod lobby;
mod mission;
mod room;

pub use config::{RoomConfig, RoomStatus};
pub use error::RoomError;
pub use lobby::LobbyHandle;
pub use mission::{default_files, deal, Allotment};
pub use room::{
    MemberSender, MemberSnapshot, Outbound, RoomHandle, RoomSnapshot,
};
