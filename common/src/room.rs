use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAIN_ROOM: &str = "main";

/// Identifier of a chat room.
///
/// The `main` room always exists. Direct-message rooms are derived from the
/// two participants, so both sides compute the same id without asking the
/// server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }

    pub fn main() -> Self {
        RoomId(MAIN_ROOM.to_string())
    }

    /// Room shared by exactly `a` and `b`. Names are ordered
    /// lexicographically and joined with `-`.
    pub fn direct(a: &str, b: &str) -> Self {
        if a <= b {
            RoomId(format!("{a}-{b}"))
        } else {
            RoomId(format!("{b}-{a}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_main(&self) -> bool {
        self.0 == MAIN_ROOM
    }
}

impl Default for RoomId {
    fn default() -> Self {
        RoomId::main()
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        RoomId(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        RoomId(id)
    }
}

impl PartialEq<str> for RoomId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoomId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
