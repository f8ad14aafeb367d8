//! # Burrow
//!
//! A cooperative heist game played over a line-oriented text protocol.
//! Three players meet in a named room, get a transfer quota and a share of
//! ten secret files each, and smuggle the most valuable ones out to Glenda
//! without anyone blowing their quota.
//!
//! This crate ties the layers together: transport → session → room.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use burrow::prelude::*;
//!
//! # async fn start() -> Result<(), BurrowError> {
//! let server = BurrowServer::builder()
//!     .bind("0.0.0.0:7777")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
mod handler;
mod server;

pub use config::{BurrowConfig, TransportKind};
pub use error::BurrowError;
pub use server::{BurrowServer, BurrowServerBuilder};

pub mod prelude {
    //! Everything needed to run a server.

    pub use crate::{
        BurrowConfig, BurrowError, BurrowServer, BurrowServerBuilder,
        TransportKind,
    };
    pub use burrow_protocol::{Command, File};
    pub use burrow_room::{LobbyHandle, RoomConfig, RoomHandle, RoomStatus};
    pub use burrow_session::{ClientSession, SessionEnd};
    pub use burrow_transport::{
        Connection, TcpTransport, Transport, WebSocketTransport,
    };
}
