use crate::session::PeerRegistry;
use crate::signaling::ChannelHub;
use crate::CoordinatorError;
use agora_core::{PeerId, ServerEvent, SignalingEnvelope};
use tracing::debug;

/// Forwards negotiation envelopes between peers without looking at the payload.
#[derive(Clone)]
pub struct SignalingRelay {
    hub: ChannelHub,
}

impl SignalingRelay {
    pub fn new(hub: ChannelHub) -> Self {
        Self { hub }
    }

    /// Rejects envelopes whose `from` is not the channel that sent them.
    pub fn check_sender(
        sender: &PeerId,
        envelope: &SignalingEnvelope,
    ) -> Result<(), CoordinatorError> {
        if envelope.from != *sender {
            return Err(CoordinatorError::SpoofedSender {
                claimed: envelope.from,
                actual: *sender,
            });
        }
        Ok(())
    }

    /// At-most-once delivery: a destination that vanished drops the envelope.
    pub fn relay(
        &self,
        registry: &PeerRegistry,
        envelope: SignalingEnvelope,
    ) -> Result<(), CoordinatorError> {
        if !registry.contains(&envelope.to) {
            return Err(CoordinatorError::RelayTargetMissing(envelope.to));
        }
        debug!("Relaying signal {} -> {}", envelope.from, envelope.to);
        let to = envelope.to;
        self.hub.send(&to, ServerEvent::Signal(envelope))
    }
}
