//! Mission files.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A document a player can transfer.
///
/// Files are plain values: moving one between inventories moves the value.
/// `size` is what a transfer to Glenda costs in bandwidth, `secrecy` is what
/// it is worth once collected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
    pub filename: String,
    pub size: i64,
    pub secrecy: i64,
}

impl File {
    /// Creates a file.
    pub fn new(filename: impl Into<String>, size: i64, secrecy: i64) -> Self {
        Self {
            filename: filename.into(),
            size,
            secrecy,
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} KB, secrecy {})", self.filename, self.size, self.secrecy)
    }
}
