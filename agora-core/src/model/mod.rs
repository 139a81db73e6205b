mod capacity;
mod error;
mod peer;
mod protocol;
mod signaling;
mod transcript;

pub use capacity::{CapacityReport, DEFAULT_MAX_CAPACITY};
pub use error::ModelError;
pub use peer::{PeerId, PeerState, Position, Rotation, DEFAULT_SPAWN_POSITION, IDENTITY_ROTATION};
pub use protocol::{ClientMessage, MovePayload, PeerSnapshot, ServerEvent};
pub use signaling::{SignalPayload, SignalingEnvelope};
pub use transcript::{TranscriptLine, purge_peer_lines};
