use agora_core::PeerId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("both sides initiated negotiation with {0}")]
    DuplicateInitiator(PeerId),

    #[error("transport failed for {peer}: {reason}")]
    Transport { peer: PeerId, reason: String },

    #[error("no local peer id yet, the coordinator has not welcomed us")]
    NotWelcomed,

    #[error("connection to coordinator closed")]
    Disconnected,

    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("invalid frame: {0}")]
    Codec(#[from] serde_json::Error),
}
