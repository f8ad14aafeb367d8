//! Wire protocol for Burrow.
//!
//! Burrow speaks newline-terminated text. This crate defines both
//! directions of that conversation:
//!
//! - **Commands** ([`Command`]): what a player types (`/msg`, `/send`, ...)
//! - **Files** ([`File`]): the mission documents players pass around
//! - **Nicknames** ([`validate_nickname`]): who may sit at the table
//! - **Server text** ([`text`]): every line the server writes back, tagged
//!   by category (`err --`, `list --`, `send --`, ...)
//!
//! It knows nothing about sockets or rooms.

mod command;
mod error;
mod file;
mod nickname;
pub mod text;

pub use command::{parse_command, Command};
pub use error::ProtocolError;
pub use file::File;
pub use nickname::{is_reserved, validate_nickname, validate_room_name};

/// The non-player character every team reports to.
pub const GLENDA: &str = "glenda";

/// Addressee that broadcasts a message to the whole room.
pub const ALL: &str = "all";

/// The message a member sends [`GLENDA`] once they stop transferring files.
pub const DONE_TOKEN: &str = "done";
