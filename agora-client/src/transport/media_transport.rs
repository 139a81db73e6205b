use crate::ClientError;
use crate::transport::LinkEvents;
use agora_core::{PeerId, SignalPayload};

/// What a negotiation blob carries, as far as the connection manager cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Offer,
    Answer,
    Candidate,
    Unknown,
}

impl PayloadKind {
    /// Reads the `{"type": "offer" | "answer", ...}` / `{"candidate": ...}` shape
    /// browser peer libraries emit. Anything else is `Unknown`.
    pub fn sniff(payload: &SignalPayload) -> Self {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(payload.as_str()) else {
            return Self::Unknown;
        };
        match value.get("type").and_then(|t| t.as_str()) {
            Some("offer") => Self::Offer,
            Some("answer") => Self::Answer,
            _ if value.get("candidate").is_some() => Self::Candidate,
            _ => Self::Unknown,
        }
    }
}

/// One live peer-to-peer connection.
pub trait ConnectionHandle: Send {
    /// Feeds a blob received from the remote side into the connection.
    fn signal(&mut self, payload: SignalPayload) -> Result<(), ClientError>;

    fn close(&mut self);
}

/// Media transport library the client drives. The manager never awaits it;
/// progress comes back through the event sender.
pub trait MediaTransport: Send {
    type Handle: ConnectionHandle;

    /// `events` is tied to this one connection; everything it reports goes there.
    fn create_connection(
        &mut self,
        remote: PeerId,
        initiator: bool,
        events: LinkEvents,
    ) -> Result<Self::Handle, ClientError>;

    fn payload_kind(&self, payload: &SignalPayload) -> PayloadKind {
        PayloadKind::sniff(payload)
    }
}
