use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two kinds of post the board accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Long-form message shown on the public wall.
    Wall,
    /// Short "small note" entry.
    Note,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Wall => "wall",
            MessageKind::Note => "note",
        }
    }

    /// Upper bound on content length, in Unicode code points.
    pub fn max_chars(self) -> usize {
        match self {
            MessageKind::Wall => 500,
            MessageKind::Note => 12,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MessageKind::Wall => "wall message",
            MessageKind::Note => "small note",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown message kind: {0}")]
pub struct UnknownKind(pub String);

/// Parses an already-normalised kind. Callers lowercase first.
impl FromStr for MessageKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wall" => Ok(MessageKind::Wall),
            "note" => Ok(MessageKind::Note),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Opaque per-client token carried in the `uid` cookie.
///
/// Correlates posts from the same browser. It is never checked against
/// any registry and is not an authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored post as returned by the list endpoints.
///
/// `content` is already HTML-escaped and safe to render verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub identity: String,
    pub nickname: Option<String>,
    pub content: String,
    pub kind: MessageKind,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
}
