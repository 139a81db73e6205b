use crate::model::capacity::CapacityReport;
use crate::model::peer::{PeerId, PeerState, Position, Rotation};
use crate::model::signaling::SignalingEnvelope;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time copy of the registry, keyed by peer id.
pub type PeerSnapshot = BTreeMap<PeerId, PeerState>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MovePayload {
    pub position: Position,
    pub rotation: Rotation,
}

/// Frames a client sends to the coordinator.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ClientMessage {
    Signal(SignalingEnvelope),
    Move(MovePayload),
    Transcript(String),
    /// Free-form chat, fanned out to every other peer.
    Msg(serde_json::Value),
}

/// Frames the coordinator sends to a client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First frame on every channel: the id the coordinator assigned.
    Welcome { peer_id: PeerId },
    /// Every peer that was present before this channel registered.
    Introduction(PeerSnapshot),
    NewPeerConnected(PeerId),
    PeerDisconnected(PeerId),
    /// Periodic presence snapshot, never containing the receiver itself.
    Peers(PeerSnapshot),
    Signal(SignalingEnvelope),
    UpdateCapacity(CapacityReport),
    PeerTranscript { peer_id: PeerId, text: String },
    InitSttFile(String),
    UpdateSttFile(String),
    ExistingTranscripts(BTreeMap<PeerId, String>),
    Msg { from: PeerId, data: serde_json::Value },
    RoomFull(CapacityReport),
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Welcome { .. } => "welcome",
            Self::Introduction(_) => "introduction",
            Self::NewPeerConnected(_) => "newPeerConnected",
            Self::PeerDisconnected(_) => "peerDisconnected",
            Self::Peers(_) => "peers",
            Self::Signal(_) => "signal",
            Self::UpdateCapacity(_) => "updateCapacity",
            Self::PeerTranscript { .. } => "peerTranscript",
            Self::InitSttFile(_) => "initSttFile",
            Self::UpdateSttFile(_) => "updateSttFile",
            Self::ExistingTranscripts(_) => "existingTranscripts",
            Self::Msg { .. } => "msg",
            Self::RoomFull(_) => "roomFull",
        }
    }
}
