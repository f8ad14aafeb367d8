//! Client command parsing.
//!
//! Every line a player types after joining is one command of the shape
//! `/<word> [arg1] [rest...]`. Parsing never fails: anything that does not
//! fit becomes [`Command::Invalid`] or [`Command::Usage`], which the room
//! turns into an `err --` line for the sender.

use std::sync::LazyLock;

use regex::Regex;

/// `/word`, then optionally one token, then optionally the rest of the line.
static COMMAND_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(/\w+)(?:\s+(\S+))?(?:\s+(.*))?$")
        .expect("command pattern is valid")
});

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/help`: show the command reference.
    Help,
    /// `/list`: show remaining bandwidth and inventory.
    List,
    /// `/look`: show who is in the room.
    Look,
    /// `/msg <to> <text>`: talk to a teammate, everyone, or Glenda.
    Msg { to: String, text: String },
    /// `/send <to> <filename>`: transfer a file.
    Send { to: String, filename: String },
    /// A known command with the wrong arguments. Holds the synopsis.
    Usage(&'static str),
    /// Anything else.
    Invalid,
}

impl Command {
    /// Synopsis for `/msg`.
    pub const MSG_USAGE: &'static str = "/msg [to] [text]";
    /// Synopsis for `/send`.
    pub const SEND_USAGE: &'static str = "/send [to] [filename]";

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::List => "list",
            Self::Look => "look",
            Self::Msg { .. } => "msg",
            Self::Send { .. } => "send",
            Self::Usage(_) => "usage",
            Self::Invalid => "invalid",
        }
    }
}

/// Parses one input line into a [`Command`].
pub fn parse_command(line: &str) -> Command {
    let Some(caps) = COMMAND_SHAPE.captures(line.trim()) else {
        return Command::Invalid;
    };
    let arg1 = caps.get(2).map(|m| m.as_str());
    let rest = caps.get(3).map(|m| m.as_str().trim()).filter(|s| !s.is_empty());

    match &caps[1] {
        "/help" => Command::Help,
        "/list" => Command::List,
        "/look" => Command::Look,
        "/msg" => match (arg1, rest) {
            (Some(to), Some(text)) => Command::Msg {
                to: to.to_string(),
                text: text.to_string(),
            },
            _ => Command::Usage(Command::MSG_USAGE),
        },
        "/send" => match (arg1, rest) {
            (Some(to), Some(filename)) => Command::Send {
                to: to.to_string(),
                filename: filename.to_string(),
            },
            _ => Command::Usage(Command::SEND_USAGE),
        },
        _ => Command::Invalid,
    }
}
