use crate::CoordinatorError;
use agora_core::{PeerId, PeerSnapshot, PeerState, Position, Rotation};
use std::collections::HashMap;

/// Connected peers and their last known spatial state.
///
/// Owned by the coordinator task; nothing else mutates it.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<PeerId, PeerState>,
    spawn: PeerState,
}

impl PeerRegistry {
    pub fn new(spawn_position: Position) -> Self {
        Self {
            peers: HashMap::new(),
            spawn: PeerState::spawn_at(spawn_position),
        }
    }

    pub fn register(&mut self, peer_id: PeerId) -> Result<PeerState, CoordinatorError> {
        if self.peers.contains_key(&peer_id) {
            return Err(CoordinatorError::DuplicatePeer(peer_id));
        }
        self.peers.insert(peer_id, self.spawn);
        Ok(self.spawn)
    }

    /// Returns false when the peer is gone; a late move is simply dropped.
    pub fn update(&mut self, peer_id: &PeerId, position: Position, rotation: Rotation) -> bool {
        let Some(state) = self.peers.get_mut(peer_id) else {
            return false;
        };
        state.position = position;
        state.rotation = rotation;
        true
    }

    pub fn remove(&mut self, peer_id: &PeerId) -> Option<PeerState> {
        self.peers.remove(peer_id)
    }

    pub fn contains(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    pub fn get(&self, peer_id: &PeerId) -> Option<&PeerState> {
        self.peers.get(peer_id)
    }

    /// Copy of every entry except `excluding`.
    pub fn snapshot(&self, excluding: Option<&PeerId>) -> PeerSnapshot {
        self.peers
            .iter()
            .filter(|(id, _)| Some(*id) != excluding)
            .map(|(id, state)| (*id, *state))
            .collect()
    }

    pub fn size(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}
