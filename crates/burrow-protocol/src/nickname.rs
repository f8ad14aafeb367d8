//! Nickname and room-name validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::{ProtocolError, ALL, GLENDA};

static NICKNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("nickname pattern is valid"));

/// Returns `true` if `name` is an addressee with a fixed meaning
/// (`glenda` or `all`), in any letter case.
pub fn is_reserved(name: &str) -> bool {
    name.eq_ignore_ascii_case(GLENDA) || name.eq_ignore_ascii_case(ALL)
}

/// Checks a prospective nickname and returns it trimmed.
///
/// A nickname is one or more word characters and may not shadow a
/// reserved addressee.
pub fn validate_nickname(input: &str) -> Result<String, ProtocolError> {
    let name = input.trim();
    if !NICKNAME.is_match(name) || is_reserved(name) {
        return Err(ProtocolError::InvalidNickname(name.to_string()));
    }
    Ok(name.to_string())
}

/// Checks a room name and returns it trimmed. Any non-empty text is
/// accepted.
pub fn validate_room_name(input: &str) -> Result<String, ProtocolError> {
    let name = input.trim();
    if name.is_empty() {
        return Err(ProtocolError::InvalidRoomName(name.to_string()));
    }
    Ok(name.to_string())
}
