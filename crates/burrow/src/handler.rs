//! Per-connection handler.
//!
//! Each accepted connection gets its own Tokio task running this handler,
//! which hands the connection to a [`ClientSession`] for its whole life.

use burrow_room::LobbyHandle;
use burrow_session::{ClientSession, SessionEnd};
use burrow_transport::Connection;

use crate::BurrowError;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Connection>(
    conn: C,
    lobby: LobbyHandle,
    outbox_size: usize,
) -> Result<SessionEnd, BurrowError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let end = ClientSession::new(conn, lobby)
        .outbox_size(outbox_size)
        .run()
        .await?;

    tracing::debug!(%conn_id, reason = %end, "connection finished");
    Ok(end)
}
