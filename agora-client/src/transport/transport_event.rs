use agora_core::{PeerId, SignalPayload};
use tokio::sync::mpsc;

/// Opaque handle to a remote audio/video stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaStream {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEventKind {
    /// The local side produced a negotiation blob for the remote side.
    Signal(SignalPayload),
    Connect,
    Stream(MediaStream),
    Close,
    Error(String),
}

/// What one peer-to-peer connection reports back.
///
/// `generation` names the link that produced the event. A link rebuilt for the
/// same remote gets a new generation, so leftovers from the old one can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportEvent {
    pub remote: PeerId,
    pub generation: u64,
    pub kind: TransportEventKind,
}

pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

/// Event sink handed to a single connection when it is created.
#[derive(Debug, Clone)]
pub struct LinkEvents {
    remote: PeerId,
    generation: u64,
    tx: TransportEventSender,
}

impl LinkEvents {
    pub(crate) fn new(remote: PeerId, generation: u64, tx: TransportEventSender) -> Self {
        Self {
            remote,
            generation,
            tx,
        }
    }

    pub fn remote(&self) -> PeerId {
        self.remote
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `false` once nobody is listening any more.
    pub fn send(&self, kind: TransportEventKind) -> bool {
        self.tx
            .send(TransportEvent {
                remote: self.remote,
                generation: self.generation,
                kind,
            })
            .is_ok()
    }

    pub fn signal(&self, payload: impl Into<SignalPayload>) -> bool {
        self.send(TransportEventKind::Signal(payload.into()))
    }

    pub fn connect(&self) -> bool {
        self.send(TransportEventKind::Connect)
    }

    pub fn stream(&self, stream: MediaStream) -> bool {
        self.send(TransportEventKind::Stream(stream))
    }

    pub fn close(&self) -> bool {
        self.send(TransportEventKind::Close)
    }

    pub fn error(&self, reason: impl Into<String>) -> bool {
        self.send(TransportEventKind::Error(reason.into()))
    }
}
