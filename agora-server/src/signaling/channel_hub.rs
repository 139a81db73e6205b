use crate::CoordinatorError;
use agora_core::{PeerId, ServerEvent};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub type ChannelSender = mpsc::UnboundedSender<ServerEvent>;

struct HubInner {
    channels: DashMap<PeerId, ChannelSender>,
}

/// Outbound side of every open channel, keyed by the peer that owns it.
#[derive(Clone)]
pub struct ChannelHub {
    inner: Arc<HubInner>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                channels: DashMap::new(),
            }),
        }
    }

    pub(crate) fn attach(&self, peer_id: PeerId, tx: ChannelSender) {
        self.inner.channels.insert(peer_id, tx);
    }

    pub(crate) fn detach(&self, peer_id: &PeerId) -> bool {
        self.inner.channels.remove(peer_id).is_some()
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.inner.channels.contains_key(peer_id)
    }

    pub fn len(&self) -> usize {
        self.inner.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.channels.is_empty()
    }

    pub fn send(&self, peer_id: &PeerId, event: ServerEvent) -> Result<(), CoordinatorError> {
        let Some(channel) = self.inner.channels.get(peer_id) else {
            return Err(CoordinatorError::RelayTargetMissing(*peer_id));
        };
        debug!("-> {} {}", peer_id, event.name());
        channel
            .send(event)
            .map_err(|_| CoordinatorError::ChannelClosed(*peer_id))
    }

    pub fn broadcast(&self, event: ServerEvent) {
        self.broadcast_except(None, event);
    }

    /// Sends to every channel but `skip`. A closed channel is logged and skipped;
    /// its own close path will clean it up.
    pub fn broadcast_except(&self, skip: Option<&PeerId>, event: ServerEvent) {
        let targets: Vec<(PeerId, ChannelSender)> = self
            .inner
            .channels
            .iter()
            .filter(|entry| Some(entry.key()) != skip)
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (peer_id, channel) in targets {
            if channel.send(event.clone()).is_err() {
                warn!("Dropping {} for closed channel {}", event.name(), peer_id);
            }
        }
    }

    /// Builds one event per channel; used where the payload depends on the receiver.
    pub fn send_each<F>(&self, mut build: F)
    where
        F: FnMut(&PeerId) -> ServerEvent,
    {
        let targets: Vec<(PeerId, ChannelSender)> = self
            .inner
            .channels
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();

        for (peer_id, channel) in targets {
            let _ = channel.send(build(&peer_id));
        }
    }
}

impl Default for ChannelHub {
    fn default() -> Self {
        Self::new()
    }
}
