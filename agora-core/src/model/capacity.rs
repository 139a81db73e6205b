use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_CAPACITY: usize = 14;

/// Current occupancy against the configured ceiling.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    pub current: usize,
    pub max: usize,
}

impl CapacityReport {
    pub fn new(current: usize, max: usize) -> Self {
        Self { current, max }
    }

    pub fn is_over(&self) -> bool {
        self.current > self.max
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}
