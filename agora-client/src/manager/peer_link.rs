/// Negotiation role for one remote peer.
///
/// Decided once, by the event that created the link: the introduction makes
/// us the initiator, anything else makes us the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Unassigned,
    Initiator,
    Responder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Unknown,
    Negotiating,
    Connected,
    Closed,
}

pub struct PeerLink<H> {
    pub(crate) generation: u64,
    pub(crate) role: Role,
    pub(crate) state: LinkState,
    pub(crate) handle: H,
}

impl<H> PeerLink<H> {
    pub(crate) fn new(generation: u64, role: Role, handle: H) -> Self {
        Self {
            generation,
            role,
            state: LinkState::Negotiating,
            handle,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn state(&self) -> LinkState {
        self.state
    }
}
