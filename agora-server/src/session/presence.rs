use crate::session::PeerRegistry;
use crate::signaling::ChannelHub;
use agora_core::ServerEvent;

/// Pushes the registry to every channel on each tick, minus the receiver itself.
#[derive(Clone)]
pub struct PresenceBroadcaster {
    hub: ChannelHub,
}

impl PresenceBroadcaster {
    pub fn new(hub: ChannelHub) -> Self {
        Self { hub }
    }

    pub fn tick(&self, registry: &PeerRegistry) {
        if registry.is_empty() {
            return;
        }
        let full = registry.snapshot(None);
        self.hub.send_each(|peer_id| {
            let mut snapshot = full.clone();
            snapshot.remove(peer_id);
            ServerEvent::Peers(snapshot)
        });
    }
}
