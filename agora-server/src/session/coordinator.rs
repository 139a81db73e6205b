use crate::config::ServerConfig;
use crate::session::{CapacityGate, PeerRegistry, PresenceBroadcaster, SessionCommand, SessionHandle};
use crate::signaling::{ChannelHub, ChannelSender, SignalingRelay};
use crate::transcript::{TranscriptBackend, TranscriptStore};
use crate::CoordinatorError;
use agora_core::{MovePayload, PeerId, ServerEvent, SignalingEnvelope, TranscriptLine};
use tokio::sync::mpsc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Owns all shared session state and applies every mutation in one task.
///
/// Commands, presence ticks and transcript polls are handled one at a time,
/// so a snapshot never sees a half-applied join or leave.
pub struct SessionCoordinator {
    config: ServerConfig,
    registry: PeerRegistry,
    gate: CapacityGate,
    hub: ChannelHub,
    relay: SignalingRelay,
    presence: PresenceBroadcaster,
    transcripts: TranscriptStore,
    command_rx: mpsc::Receiver<SessionCommand>,
}

impl SessionCoordinator {
    pub fn new(
        config: ServerConfig,
        hub: ChannelHub,
        transcripts: TranscriptStore,
        command_rx: mpsc::Receiver<SessionCommand>,
    ) -> Self {
        Self {
            registry: PeerRegistry::new(config.spawn_position),
            gate: CapacityGate::new(config.max_capacity, config.enforce_capacity),
            relay: SignalingRelay::new(hub.clone()),
            presence: PresenceBroadcaster::new(hub.clone()),
            hub,
            transcripts,
            command_rx,
            config,
        }
    }

    /// Loads the transcript log, starts the coordinator task and returns its handle.
    pub async fn spawn(config: ServerConfig, backend: Box<dyn TranscriptBackend>) -> SessionHandle {
        let (cmd_tx, cmd_rx) = mpsc::channel(256);
        let hub = ChannelHub::new();
        let transcripts = TranscriptStore::load(backend).await;
        let handle = SessionHandle::new(cmd_tx, hub.clone(), config.max_capacity);

        let coordinator = Self::new(config, hub, transcripts, cmd_rx);
        tokio::spawn(coordinator.run());

        handle
    }

    pub async fn run(mut self) {
        info!("Session coordinator started");

        let mut presence_tick = time::interval(self.config.presence_interval);
        presence_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut transcript_poll = time::interval(self.config.transcript_poll_interval);
        transcript_poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("Command channel closed. Shutting down coordinator.");
                            break;
                        }
                    }
                }

                _ = presence_tick.tick() => self.presence.tick(&self.registry),

                _ = transcript_poll.tick() => {
                    if let Some(content) = self.transcripts.poll_external_change().await {
                        self.publish_transcript(content);
                    }
                }
            }
        }

        info!("Session coordinator finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        match cmd {
            SessionCommand::Open { tx, reply } => {
                let assigned = self.open_channel(tx);
                let _ = reply.send(assigned);
            }

            SessionCommand::Move { peer_id, payload } => self.apply_move(peer_id, payload),

            SessionCommand::Signal { peer_id, envelope } => {
                if let Err(e) = self.relay_signal(peer_id, envelope) {
                    match e {
                        CoordinatorError::RelayTargetMissing(to) => {
                            warn!("Peer not found! Dropping signal from {} to {}", peer_id, to)
                        }
                        other => warn!("Rejected signal from {}: {}", peer_id, other),
                    }
                }
            }

            SessionCommand::Transcript { peer_id, text } => {
                self.record_transcript(peer_id, text).await
            }

            SessionCommand::Chat { peer_id, data } => {
                if !self.registry.contains(&peer_id) {
                    return;
                }
                debug!("Chat message from {}", peer_id);
                self.hub
                    .broadcast_except(Some(&peer_id), ServerEvent::Msg { from: peer_id, data });
            }

            SessionCommand::Close { peer_id, ack } => {
                self.close_channel(peer_id).await;
                if let Some(ack) = ack {
                    let _ = ack.send(());
                }
            }
        }
    }

    fn open_channel(&mut self, tx: ChannelSender) -> Option<PeerId> {
        let peer_id = PeerId::new();

        if !self.gate.admits(&self.registry) {
            let report = self.gate.report(&self.registry);
            warn!(
                "Turning away channel: room full ({}/{})",
                report.current, report.max
            );
            let _ = tx.send(ServerEvent::RoomFull(report));
            return None;
        }

        info!("Peer {} joined", peer_id);

        let introduction = self.registry.snapshot(None);
        let _ = tx.send(ServerEvent::Welcome { peer_id });
        let _ = tx.send(ServerEvent::Introduction(introduction));

        // Sent before the channel is attached, so the newcomer never hears about itself.
        self.hub.broadcast(ServerEvent::NewPeerConnected(peer_id));

        if let Err(e) = self.registry.register(peer_id) {
            error!("Failed to register {}: {}", peer_id, e);
            return None;
        }
        self.hub.attach(peer_id, tx.clone());
        self.broadcast_capacity();

        let _ = tx.send(ServerEvent::InitSttFile(self.transcripts.content().to_string()));
        let _ = tx.send(ServerEvent::ExistingTranscripts(
            self.transcripts.live_lines().clone(),
        ));

        Some(peer_id)
    }

    fn apply_move(&mut self, peer_id: PeerId, payload: MovePayload) {
        if !self
            .registry
            .update(&peer_id, payload.position, payload.rotation)
        {
            debug!("Ignoring move from departed peer {}", peer_id);
        }
    }

    fn relay_signal(
        &self,
        peer_id: PeerId,
        envelope: SignalingEnvelope,
    ) -> Result<(), CoordinatorError> {
        SignalingRelay::check_sender(&peer_id, &envelope)?;
        self.relay.relay(&self.registry, envelope)
    }

    async fn record_transcript(&mut self, peer_id: PeerId, text: String) {
        if !self.registry.contains(&peer_id) {
            debug!("Ignoring transcript from departed peer {}", peer_id);
            return;
        }

        let line = TranscriptLine::new(peer_id, text);
        self.hub.broadcast_except(
            Some(&peer_id),
            ServerEvent::PeerTranscript {
                peer_id,
                text: line.text.clone(),
            },
        );

        let content = self.transcripts.append(line).await;
        self.publish_transcript(content);
    }

    async fn close_channel(&mut self, peer_id: PeerId) {
        self.hub.detach(&peer_id);

        if self.registry.remove(&peer_id).is_none() {
            debug!("Close for {} ignored, already gone", peer_id);
            return;
        }

        info!("Peer {} left", peer_id);

        let content = self.transcripts.purge(&peer_id).await;
        self.hub.broadcast(ServerEvent::PeerDisconnected(peer_id));
        self.broadcast_capacity();
        self.publish_transcript(content);
    }

    fn broadcast_capacity(&self) {
        let report = self.gate.report(&self.registry);
        debug!("Capacity {}/{}", report.current, report.max);
        self.hub.broadcast(ServerEvent::UpdateCapacity(report));
    }

    /// Single exit for transcript content: appends, purges and outside edits all land here.
    fn publish_transcript(&self, content: String) {
        self.hub.broadcast(ServerEvent::UpdateSttFile(content));
    }
}
