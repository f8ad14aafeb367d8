//! Player sessions for Burrow.
//!
//! This crate drives one connection from accept to close:
//!
//! 1. **Negotiation**: prompt for a nickname and a room name, re-prompting
//!    on invalid answers ([`ask_nickname`], [`ask_room_name`])
//! 2. **Admission**: join the room through the lobby, asking for another
//!    nickname when the room already has one like it
//! 3. **Duties**: an inbound task turning lines into room commands and an
//!    outbound task writing whatever the room delivers
//! 4. **Termination**: leave the room and close the connection, once
//!
//! # How it fits in the stack
//!
//! ```text
//! Server (above)  ← spawns one ClientSession per accepted connection
//!     ↕
//! Session Layer (this crate)  ← owns the connection, talks to the room
//!     ↕
//! Room Layer (below)  ← LobbyHandle, RoomHandle, Outbound
//! ```

mod error;
mod negotiate;
mod session;

pub use error::SessionError;
pub use negotiate::{ask_nickname, ask_room_name};
pub use session::{ClientSession, SessionEnd};
