use crate::transport::MediaStream;
use agora_core::{CapacityReport, PeerId, PeerSnapshot};
use std::collections::BTreeMap;

/// What the rendering layer gets to see.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Welcomed(PeerId),
    PeerJoined(PeerId),
    PeerLeft(PeerId),
    PeerConnected(PeerId),
    RemoteStream(PeerId, MediaStream),
    Peers(PeerSnapshot),
    PeerTranscript { peer_id: PeerId, text: String },
    /// Full transcript log, either the catch-up copy or a later update.
    TranscriptLog(String),
    ExistingTranscripts(BTreeMap<PeerId, String>),
    Capacity(CapacityReport),
    Chat { from: PeerId, data: serde_json::Value },
    RoomFull(CapacityReport),
}
