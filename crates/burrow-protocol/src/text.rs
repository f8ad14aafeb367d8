//! Everything the server writes to a player.
//!
//! Each line starts with a category tag so clients (and humans) can tell
//! errors, listings, transfers and chatter apart:
//!
//! ```text
//! err -- | ...      protocol error, only the sender sees it
//! list -- | ...     /list output
//! send -- | ...     file transfer receipts
//! look -- | ...     /look output
//! help -- | ...     /help output
//! --> nick | ...    chat from a teammate
//! glenda | ...      the non-player character
//! fail | ...        game over narrative
//! -- | ...          room narrative
//! ```
//!
//! Every function returns text terminated by `\n`, ready to be written
//! as-is.

use std::fmt::Write;

use crate::File;

// ---------------------------------------------------------------------------
// Negotiation
// ---------------------------------------------------------------------------

pub const NICKNAME_PROMPT: &str = "Choose a nickname: ";

pub const ROOM_PROMPT: &str = "Name the game to join: ";

pub const INVALID_NICKNAME: &str =
    "err -- | Invalid nickname, use letters, digits or _ (and not glenda)\n";

pub const INVALID_ROOM_NAME: &str = "err -- | The game needs a name\n";

pub fn nickname_taken(nickname: &str) -> String {
    format!("err -- | Someone in this game already goes by {nickname}, pick another\n")
}

pub fn room_full(room: &str) -> String {
    format!("err -- | Game {room} is full or already underway, goodbye\n")
}

pub fn room_unavailable(room: &str) -> String {
    format!("err -- | Game {room} is not reachable right now, goodbye\n")
}

// ---------------------------------------------------------------------------
// Lobby narrative
// ---------------------------------------------------------------------------

pub fn welcome(room: &str, members: usize, capacity: usize) -> String {
    format!(
        "-- | Welcome to {room} ({members}/{capacity}). Waiting for the rest of the team...\n"
    )
}

pub fn joined(nickname: &str, members: usize, capacity: usize) -> String {
    format!("-- | {nickname} has joined ({members}/{capacity})\n")
}

pub fn left(nickname: &str, members: usize, capacity: usize) -> String {
    format!("-- | {nickname} has left ({members}/{capacity})\n")
}

pub const MISSION_START: &str = "* -- | Everyone has arrived, mission starting...\n\
* -- | Ask for /help to get familiar around here\n";

pub fn briefing(bandwidth: i64, files: usize) -> String {
    format!(
        "* -- | Your transfer quota is {bandwidth} KB and you hold {files} files. Try /list\n"
    )
}

// ---------------------------------------------------------------------------
// Errors back to the sender
// ---------------------------------------------------------------------------

pub const INVALID_COMMAND: &str =
    "err -- | Invalid command, try /help to see valid commands\n";

pub fn usage(synopsis: &str) -> String {
    format!("err -- | Usage: {synopsis}\n")
}

pub fn no_such_member(to: &str) -> String {
    format!("err -- | There is no one here named {to}\n")
}

pub fn no_such_file(filename: &str) -> String {
    format!("err -- | Error sending file: file \"{filename}\" does not exist\n")
}

pub const ALREADY_DONE: &str =
    "err -- | I thought you said you were done sending files.\n";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

pub const HELP: &str = "help -- |  Usage:
help -- |
help -- |     /[cmd] [arguments]
help -- |
help -- |  Available commands:
help -- |
help -- |    /help                    show this text
help -- |    /msg [to] [text]         send message to coworker, all, or glenda
help -- |    /list                    look at files you have access to
help -- |    /send [to] [filename]    move file to coworker or glenda
help -- |    /look                    show coworkers
";

/// Renders the `/list` table.
pub fn list<'a>(bandwidth: i64, files: impl IntoIterator<Item = &'a File>) -> String {
    let mut out = format!("list -- | Remaining Bandwidth: {bandwidth} KB\n");
    let _ = writeln!(
        out,
        "list -- | {:>20}  {:>8}  {:>13}",
        "Filename", "Size", "Secrecy Value"
    );
    for file in files {
        let _ = writeln!(
            out,
            "list -- | {:>20}  {:>5} KB  {:>13}",
            file.filename, file.size, file.secrecy
        );
    }
    out
}

/// Renders the `/look` listing. Glenda is always last.
pub fn look<'a>(nicknames: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("look -- | You look around at your co-workers' nametags:\n");
    for name in nicknames {
        let _ = writeln!(out, "look -- | {name}");
    }
    out.push_str("look -- | glenda\n");
    out
}

pub fn direct(from: &str, text: &str) -> String {
    format!("--> {from} | {text}\n")
}

pub fn broadcast(from: &str, text: &str) -> String {
    format!("--> {from} (all) | {text}\n")
}

pub fn sent(filename: &str, bandwidth: i64) -> String {
    format!("send -- | Sent file: {filename}\nsend -- | Bandwidth remaining: {bandwidth} KB\n")
}

pub fn received(filename: &str, from: &str) -> String {
    format!("send -- | Received file: {filename} from {from}\n")
}

pub fn member_done(nickname: &str) -> String {
    format!(
        "-- | {nickname} has finished sending files. Waiting for teammates to finish...\n"
    )
}

// ---------------------------------------------------------------------------
// Glenda and endings
// ---------------------------------------------------------------------------

pub const GLENDA_BRIEFING: &str = "glenda | Psst, hey there. I'm going to need your help if we want to exfiltrate
glenda | these documents. You have clearance that I don't.
glenda |
glenda | You each have access to a different set of sensitive files. Within your
glenda | group you can freely send files to each other for further analysis.
glenda | However, when sending files to me, the corporate infrastructure team
glenda | will be alerted if you exceed your transfer quota. Working on too many
glenda | files will make them suspicious.
glenda |
glenda | Please optimize your transfers by the political impact it will create
glenda | without exceeding any individual transfer quota. The file's security
glenda | clearance is a good metric to go by for that. Thanks!
glenda |
glenda | When each of you is finished sending me files, send me the message
glenda | 'done'. I'll wait to hear this from all of you before we execute phase
glenda | two.
";

pub const FAIL_BANDWIDTH: &str = "fail | You wake up bleary eyed and alone in a concrete box. Your head has a
fail | lump on the side. It seems corporate security noticed you didn't belong,
fail | you should have acted faster. You wonder if you will ever see your
fail | burrow again.
";

pub fn fail_abort(nickname: &str) -> String {
    format!(
        "fail | {nickname} chickened out and bolted for the stairwell. Alarms start
fail | ringing on every floor. Without the whole team the job is blown, and you
fail | slip out the loading dock empty handed.
"
    )
}

pub fn success(score: i64, files: usize) -> String {
    format!(
        "glenda | That's everything. {files} files are on their way out of the building.
glenda | Phase two starts tonight. Nice work, all of you.
-- | Mission complete. Final score: {score}
"
    )
}
