use crate::ClientError;
use crate::manager::{ClientEvent, LinkState, PeerLink, Role};
use crate::transport::{
    ConnectionHandle, LinkEvents, MediaTransport, PayloadKind, TransportEvent,
    TransportEventKind, TransportEventSender,
};
use agora_core::{ClientMessage, PeerId, ServerEvent, SignalingEnvelope};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Keeps one peer-to-peer link per remote peer and decides who initiates.
pub struct ConnectionManager<T: MediaTransport> {
    local_id: Option<PeerId>,
    transport: T,
    links: HashMap<PeerId, PeerLink<T::Handle>>,
    next_generation: u64,
    transport_tx: TransportEventSender,
    outbound: mpsc::UnboundedSender<ClientMessage>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl<T: MediaTransport> ConnectionManager<T> {
    pub fn new(
        transport: T,
        transport_tx: TransportEventSender,
        outbound: mpsc::UnboundedSender<ClientMessage>,
        events: mpsc::UnboundedSender<ClientEvent>,
    ) -> Self {
        Self {
            local_id: None,
            transport,
            links: HashMap::new(),
            next_generation: 0,
            transport_tx,
            outbound,
            events,
        }
    }

    pub fn local_id(&self) -> Option<PeerId> {
        self.local_id
    }

    pub fn role_of(&self, remote: &PeerId) -> Role {
        self.links
            .get(remote)
            .map_or(Role::Unassigned, |link| link.role())
    }

    pub fn state_of(&self, remote: &PeerId) -> LinkState {
        self.links
            .get(remote)
            .map_or(LinkState::Unknown, |link| link.state())
    }

    pub fn remotes(&self) -> Vec<PeerId> {
        self.links.keys().copied().collect()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn handle_server_event(&mut self, event: ServerEvent) -> Result<(), ClientError> {
        match event {
            ServerEvent::Welcome { peer_id } => {
                info!("Welcomed as {}", peer_id);
                self.local_id = Some(peer_id);
                self.emit(ClientEvent::Welcomed(peer_id));
            }

            ServerEvent::Introduction(existing) => {
                info!("Introduced to {} existing peers", existing.len());
                for remote in existing.keys().copied() {
                    if Some(remote) == self.local_id || self.links.contains_key(&remote) {
                        continue;
                    }
                    self.open_link(remote, Role::Initiator)?;
                    self.emit(ClientEvent::PeerJoined(remote));
                }
                self.emit(ClientEvent::Peers(existing));
            }

            ServerEvent::NewPeerConnected(remote) => {
                if Some(remote) == self.local_id {
                    return Ok(());
                }
                if !self.links.contains_key(&remote) {
                    self.open_link(remote, Role::Responder)?;
                }
                self.emit(ClientEvent::PeerJoined(remote));
            }

            ServerEvent::PeerDisconnected(remote) => {
                self.drop_link(&remote);
                self.emit(ClientEvent::PeerLeft(remote));
            }

            ServerEvent::Signal(envelope) => self.apply_signal(envelope)?,

            ServerEvent::Peers(peers) => self.emit(ClientEvent::Peers(peers)),
            ServerEvent::UpdateCapacity(report) => self.emit(ClientEvent::Capacity(report)),
            ServerEvent::PeerTranscript { peer_id, text } => {
                self.emit(ClientEvent::PeerTranscript { peer_id, text })
            }
            ServerEvent::InitSttFile(log) | ServerEvent::UpdateSttFile(log) => {
                self.emit(ClientEvent::TranscriptLog(log))
            }
            ServerEvent::ExistingTranscripts(live) => {
                self.emit(ClientEvent::ExistingTranscripts(live))
            }
            ServerEvent::Msg { from, data } => self.emit(ClientEvent::Chat { from, data }),
            ServerEvent::RoomFull(report) => {
                warn!("Room is full ({}/{})", report.current, report.max);
                self.emit(ClientEvent::RoomFull(report));
            }
        }
        Ok(())
    }

    /// Events from a link that has since been released or rebuilt are ignored.
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> Result<(), ClientError> {
        let remote = event.remote;
        let current = self.links.get(&remote).map(|link| link.generation);
        if current != Some(event.generation) {
            debug!(
                "Ignoring transport event from stale link {} (generation {})",
                remote, event.generation
            );
            return Ok(());
        }

        match event.kind {
            TransportEventKind::Signal(payload) => {
                let from = self.local_id.ok_or(ClientError::NotWelcomed)?;
                self.outbound
                    .send(ClientMessage::Signal(SignalingEnvelope::new(
                        remote, from, payload,
                    )))
                    .map_err(|_| ClientError::Disconnected)?;
            }

            TransportEventKind::Connect => {
                if let Some(link) = self.links.get_mut(&remote) {
                    link.state = LinkState::Connected;
                }
                info!("Connected to {}", remote);
                self.emit(ClientEvent::PeerConnected(remote));
            }

            TransportEventKind::Stream(stream) => {
                self.emit(ClientEvent::RemoteStream(remote, stream));
            }

            TransportEventKind::Close => {
                info!("Link to {} closed", remote);
                self.drop_link(&remote);
            }

            TransportEventKind::Error(reason) => {
                warn!("Link to {} failed: {}", remote, reason);
                self.drop_link(&remote);
                return Err(ClientError::Transport {
                    peer: remote,
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Unknown senders get a responder link first; known links take every
    /// envelope whatever their state, so multi-round negotiation works.
    fn apply_signal(&mut self, envelope: SignalingEnvelope) -> Result<(), ClientError> {
        let remote = envelope.from;
        let kind = self.transport.payload_kind(&envelope.payload);

        let collides = self.links.get(&remote).map(|link| {
            link.role == Role::Initiator
                && link.state == LinkState::Negotiating
                && kind == PayloadKind::Offer
        });

        match collides {
            None => self.open_link(remote, Role::Responder)?,
            Some(true) => return self.restart_after_collision(remote),
            Some(false) => {}
        }

        match self.links.get_mut(&remote) {
            Some(link) => link.handle.signal(envelope.payload),
            None => Ok(()),
        }
    }

    /// Both sides sent an offer. The half-built link is torn down and rebuilt
    /// with the smaller id as initiator; the colliding offer is discarded and
    /// the responder waits for the winner's fresh one.
    fn restart_after_collision(&mut self, remote: PeerId) -> Result<(), ClientError> {
        let local = self.local_id.ok_or(ClientError::NotWelcomed)?;
        warn!("{}", ClientError::DuplicateInitiator(remote));

        self.drop_link(&remote);
        let role = if local < remote {
            Role::Initiator
        } else {
            Role::Responder
        };
        self.open_link(remote, role)
    }

    fn open_link(&mut self, remote: PeerId, role: Role) -> Result<(), ClientError> {
        self.next_generation += 1;
        let generation = self.next_generation;
        let events = LinkEvents::new(remote, generation, self.transport_tx.clone());

        let handle = self
            .transport
            .create_connection(remote, role == Role::Initiator, events)?;
        debug!("Negotiating with {} as {:?} (generation {})", remote, role, generation);
        self.links
            .insert(remote, PeerLink::new(generation, role, handle));
        Ok(())
    }

    fn drop_link(&mut self, remote: &PeerId) {
        let Some(mut link) = self.links.remove(remote) else {
            return;
        };
        link.state = LinkState::Closed;
        link.handle.close();
        debug!("Released link to {} ({:?})", remote, link.state);
    }

    fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event);
    }
}
