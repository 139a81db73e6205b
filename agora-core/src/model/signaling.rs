use crate::model::peer::PeerId;
use serde::{Deserialize, Serialize};

/// Negotiation blob exchanged between two peers.
///
/// The coordinator never looks inside it; only the connection layer on
/// each client knows what it means.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct SignalPayload(pub String);

impl SignalPayload {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SignalPayload {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SignalPayload {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SignalingEnvelope {
    pub to: PeerId,
    pub from: PeerId,
    pub payload: SignalPayload,
}

impl SignalingEnvelope {
    pub fn new(to: PeerId, from: PeerId, payload: impl Into<SignalPayload>) -> Self {
        Self {
            to,
            from,
            payload: payload.into(),
        }
    }
}
