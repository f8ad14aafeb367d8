//! Server configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```json
//! {
//!   "bind": "0.0.0.0:7777",
//!   "transport": "websocket",
//!   "room": { "seed": 42 }
//! }
//! ```

use std::fmt;
use std::path::Path;

use burrow_room::RoomConfig;
use serde::{Deserialize, Serialize};

use crate::BurrowError;

/// Which transport the server listens with.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Newline-terminated lines over TCP (telnet, netcat).
    #[default]
    Tcp,
    /// One WebSocket text frame per line.
    #[value(name = "websocket")]
    WebSocket,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::WebSocket => write!(f, "websocket"),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurrowConfig {
    /// Address to listen on.
    pub bind: String,
    pub transport: TransportKind,
    /// Default `tracing` filter; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Settings for every room the lobby creates.
    pub room: RoomConfig,
}

impl Default for BurrowConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7777".to_string(),
            transport: TransportKind::Tcp,
            log_level: "info".to_string(),
            room: RoomConfig::default(),
        }
    }
}

impl BurrowConfig {
    /// Reads a JSON config file.
    pub fn load(path: &Path) -> Result<Self, BurrowError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BurrowError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| BurrowError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BurrowConfig::default();
        assert_eq!(config.bind, "127.0.0.1:7777");
        assert_eq!(config.transport, TransportKind::Tcp);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.room, RoomConfig::default());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: BurrowConfig = serde_json::from_str(
            r#"{"transport": "websocket", "room": {"seed": 42}}"#,
        )
        .unwrap();
        assert_eq!(config.transport, TransportKind::WebSocket);
        assert_eq!(config.room.seed, Some(42));
        assert_eq!(config.room.capacity, 3);
        assert_eq!(config.bind, "127.0.0.1:7777");
    }

    #[test]
    fn test_unknown_transport_is_rejected() {
        let result: Result<BurrowConfig, _> =
            serde_json::from_str(r#"{"transport": "carrier-pigeon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "burrow-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"bind": "0.0.0.0:9000"}"#).unwrap();

        let config = BurrowConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = BurrowConfig::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(BurrowError::ConfigRead { .. })));
    }

    #[test]
    fn test_load_bad_json_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "burrow-config-bad-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();

        let result = BurrowConfig::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(BurrowError::ConfigParse { .. })));
    }

    #[test]
    fn test_transport_kind_display_matches_serde_name() {
        for kind in [TransportKind::Tcp, TransportKind::WebSocket] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }
}
