use agora_core::PeerId;
use thiserror::Error;

/// Failures inside the coordinator. None of them are fatal to the process;
/// each one is confined to the peer or message that caused it.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("relay target {0} is not connected")]
    RelayTargetMissing(PeerId),

    #[error("signal from {actual} claimed to be from {claimed}")]
    SpoofedSender { claimed: PeerId, actual: PeerId },

    #[error("peer {0} is already registered")]
    DuplicatePeer(PeerId),

    #[error("channel for {0} is closed")]
    ChannelClosed(PeerId),

    #[error("coordinator is not running")]
    CoordinatorGone,
}
