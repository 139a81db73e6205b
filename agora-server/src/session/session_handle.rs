use crate::session::SessionCommand;
use crate::signaling::{ChannelHub, ChannelSender};
use crate::CoordinatorError;
use agora_core::{ClientMessage, PeerId};
use tokio::sync::{mpsc, oneshot};

/// Cloneable front door to a running coordinator.
#[derive(Clone)]
pub struct SessionHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    hub: ChannelHub,
    max_capacity: usize,
}

impl SessionHandle {
    pub(crate) fn new(
        cmd_tx: mpsc::Sender<SessionCommand>,
        hub: ChannelHub,
        max_capacity: usize,
    ) -> Self {
        Self {
            cmd_tx,
            hub,
            max_capacity,
        }
    }

    /// Registers a new channel; `Ok(None)` means the coordinator turned it away.
    pub async fn open(&self, tx: ChannelSender) -> Result<Option<PeerId>, CoordinatorError> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Open { tx, reply }).await?;
        rx.await.map_err(|_| CoordinatorError::CoordinatorGone)
    }

    pub async fn dispatch(
        &self,
        peer_id: PeerId,
        message: ClientMessage,
    ) -> Result<(), CoordinatorError> {
        let cmd = match message {
            ClientMessage::Move(payload) => SessionCommand::Move { peer_id, payload },
            ClientMessage::Signal(envelope) => SessionCommand::Signal { peer_id, envelope },
            ClientMessage::Transcript(text) => SessionCommand::Transcript { peer_id, text },
            ClientMessage::Msg(data) => SessionCommand::Chat { peer_id, data },
        };
        self.send(cmd).await
    }

    /// Resolves after the peer has been removed and everyone was told.
    pub async fn close(&self, peer_id: PeerId) -> Result<(), CoordinatorError> {
        let (ack, rx) = oneshot::channel();
        self.send(SessionCommand::Close {
            peer_id,
            ack: Some(ack),
        })
        .await?;
        rx.await.map_err(|_| CoordinatorError::CoordinatorGone)
    }

    pub fn connected(&self) -> usize {
        self.hub.len()
    }

    pub fn max_capacity(&self) -> usize {
        self.max_capacity
    }

    async fn send(&self, cmd: SessionCommand) -> Result<(), CoordinatorError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| CoordinatorError::CoordinatorGone)
    }
}
