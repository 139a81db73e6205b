use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One line of the shared transcript log, persisted as `[<peer>]: <text>`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub peer_id: PeerId,
    pub text: String,
}

impl TranscriptLine {
    /// Line breaks in `text` become spaces, so one entry is always one tagged line.
    pub fn new(peer_id: PeerId, text: impl Into<String>) -> Self {
        Self {
            peer_id,
            text: text.into().replace(['\r', '\n'], " "),
        }
    }

    /// Prefix every line owned by `peer_id` starts with.
    pub fn tag(peer_id: &PeerId) -> String {
        format!("[{}]:", peer_id)
    }

    /// The line as it is appended to the log, newline included.
    pub fn to_log_entry(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.peer_id, self.text)
    }
}

/// Drops every line tagged with `peer_id`, keeping the rest in order.
///
/// Splitting and re-joining on `\n` keeps a trailing newline intact.
pub fn purge_peer_lines(content: &str, peer_id: &PeerId) -> String {
    let tag = TranscriptLine::tag(peer_id);
    content
        .split('\n')
        .filter(|line| !line.starts_with(&tag))
        .collect::<Vec<_>>()
        .join("\n")
}
