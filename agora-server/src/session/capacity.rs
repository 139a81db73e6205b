use crate::session::registry::PeerRegistry;
use agora_core::CapacityReport;

/// Capacity is derived from the registry on demand, never stored.
#[derive(Debug, Clone, Copy)]
pub struct CapacityGate {
    max: usize,
    enforce: bool,
}

impl CapacityGate {
    pub fn new(max: usize, enforce: bool) -> Self {
        Self { max, enforce }
    }

    pub fn report(&self, registry: &PeerRegistry) -> CapacityReport {
        CapacityReport::new(registry.size(), self.max)
    }

    /// Whether one more peer may register. Always true for an advisory gate.
    pub fn admits(&self, registry: &PeerRegistry) -> bool {
        !self.enforce || registry.size() < self.max
    }

    pub fn max(&self) -> usize {
        self.max
    }
}
