use crate::model::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub type Position = [f64; 3];

/// Unit quaternion in XYZW order.
pub type Rotation = [f64; 4];

pub const DEFAULT_SPAWN_POSITION: Position = [0.0, 0.5, 0.0];
pub const IDENTITY_ROTATION: Rotation = [0.0, 0.0, 0.0, 1.0];

/// Identifier the coordinator hands out when a channel opens.
///
/// Ids are random v4 uuids, so an id is never handed out twice during the
/// lifetime of a process.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
#[serde(transparent)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for PeerId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ModelError::InvalidPeerId(s.to_string()))
    }
}

impl TryFrom<String> for PeerId {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Last known spatial state of a peer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct PeerState {
    pub position: Position,
    pub rotation: Rotation,
}

impl PeerState {
    pub fn new(position: Position, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    pub fn spawn_at(position: Position) -> Self {
        Self::new(position, IDENTITY_ROTATION)
    }

    pub fn distance_to(&self, other: &PeerState) -> f64 {
        self.position
            .iter()
            .zip(other.position.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

impl Default for PeerState {
    fn default() -> Self {
        Self::spawn_at(DEFAULT_SPAWN_POSITION)
    }
}
