use crate::signaling::ChannelSender;
use agora_core::{MovePayload, PeerId, SignalingEnvelope};
use tokio::sync::oneshot;

/// Commands fed into the coordinator by channel handlers.
#[derive(Debug)]
pub enum SessionCommand {
    /// A channel opened. The reply carries the assigned id, or `None` when the
    /// join was refused.
    Open {
        tx: ChannelSender,
        reply: oneshot::Sender<Option<PeerId>>,
    },

    Move { peer_id: PeerId, payload: MovePayload },

    Signal {
        peer_id: PeerId,
        envelope: SignalingEnvelope,
    },

    Transcript { peer_id: PeerId, text: String },

    Chat {
        peer_id: PeerId,
        data: serde_json::Value,
    },

    /// The channel closed. The ack fires once the peer is fully gone.
    Close {
        peer_id: PeerId,
        ack: Option<oneshot::Sender<()>>,
    },
}
