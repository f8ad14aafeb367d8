//! Room configuration and state machine.

use burrow_protocol::File;
use serde::{Deserialize, Serialize};

use crate::{mission, RoomError};

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration shared by every room the lobby creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    /// Members needed to start; also the hard roster limit.
    pub capacity: usize,

    /// Transfer quotas handed out (shuffled) when the game starts.
    pub bandwidths: Vec<i64>,

    /// The mission's file table, dealt round-robin in join order.
    pub files: Vec<File>,

    /// Seed for the bandwidth shuffle. `None` draws from the OS.
    pub seed: Option<u64>,

    /// Capacity of every bounded queue (room events, member outboxes).
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            bandwidths: vec![50, 81, 120],
            files: mission::default_files(),
            seed: None,
            channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// Checks that a room built from this config can actually start.
    pub fn validate(&self) -> Result<(), RoomError> {
        if self.capacity == 0 {
            return Err(RoomError::InvalidConfig(
                "capacity must be at least 1".into(),
            ));
        }
        if self.bandwidths.len() < self.capacity {
            return Err(RoomError::InvalidConfig(format!(
                "{} bandwidths for {} members",
                self.bandwidths.len(),
                self.capacity
            )));
        }
        if self.channel_size == 0 {
            return Err(RoomError::InvalidConfig(
                "channel_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RoomStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a room.
///
/// Transitions only move forward:
///
/// ```text
/// Lobby → Running → Fail
///               └─→ Success
/// ```
///
/// - **Lobby**: accepting members, player commands are discarded.
/// - **Running**: roster is full, files and bandwidth are dealt.
/// - **Fail**: someone blew their quota or a member walked out.
/// - **Success**: every member told Glenda they are done.
///
/// `Fail` and `Success` are terminal. The room actor then ignores gameplay
/// and stops once the last member has left. A room still in `Lobby` also
/// stops when its last member leaves; the lobby opens a fresh one under the
/// same name on the next join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Lobby,
    Running,
    Fail,
    Success,
}

impl RoomStatus {
    /// Returns `true` if the room is accepting new members.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` while gameplay commands are processed.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` for `Fail` and `Success`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Fail | Self::Success)
    }

    /// Returns `true` if moving to `target` is a legal transition.
    pub fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Lobby, Self::Running)
                | (Self::Running, Self::Fail)
                | (Self::Running, Self::Success)
        )
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Running => write!(f, "Running"),
            Self::Fail => write!(f, "Fail"),
            Self::Success => write!(f, "Success"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_status_transitions_only_forward() {
        use RoomStatus::*;
        assert!(Lobby.can_transition_to(Running));
        assert!(Running.can_transition_to(Fail));
        assert!(Running.can_transition_to(Success));

        assert!(!Lobby.can_transition_to(Fail));
        assert!(!Lobby.can_transition_to(Success));
        assert!(!Running.can_transition_to(Lobby));
        for terminal in [Fail, Success] {
            for target in [Lobby, Running, Fail, Success] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_room_status_predicates() {
        assert!(RoomStatus::Lobby.is_joinable());
        assert!(!RoomStatus::Running.is_joinable());
        assert!(RoomStatus::Running.is_running());
        assert!(RoomStatus::Fail.is_terminal());
        assert!(RoomStatus::Success.is_terminal());
        assert!(!RoomStatus::Running.is_terminal());
    }

    #[test]
    fn test_room_status_display() {
        assert_eq!(RoomStatus::Lobby.to_string(), "Lobby");
        assert_eq!(RoomStatus::Success.to_string(), "Success");
    }

    #[test]
    fn test_room_config_default() {
        let config = RoomConfig::default();
        assert_eq!(config.capacity, 3);
        assert_eq!(config.bandwidths, vec![50, 81, 120]);
        assert_eq!(config.files.len(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_room_config_validate_rejects_short_bandwidth_list() {
        let config = RoomConfig {
            bandwidths: vec![50, 81],
            ..RoomConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RoomError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_room_config_validate_rejects_zero_capacity() {
        let config = RoomConfig {
            capacity: 0,
            ..RoomConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_room_config_partial_json_uses_defaults() {
        let config: RoomConfig =
            serde_json::from_str(r#"{"seed": 7}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.capacity, 3);
        assert_eq!(config.files.len(), 10);
    }
}
