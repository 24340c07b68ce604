//! FleetSnapshot - a point-in-time view of the float network.

use chrono::{DateTime, Utc};

use crate::EnrichedFloat;

/// The enriched floats of one fleet load, plus the backend's total count.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetSnapshot {
    /// Enriched floats in listing order.
    pub floats: Vec<EnrichedFloat>,

    /// Total number of floats known to the backend (0 if unavailable).
    pub total_count: u64,

    /// When the load completed.
    pub fetched_at: DateTime<Utc>,
}

impl FleetSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(floats: Vec<EnrichedFloat>, total_count: u64) -> Self {
        Self {
            floats,
            total_count,
            fetched_at: Utc::now(),
        }
    }

    /// Check if the snapshot holds no floats.
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    /// Number of floats in the snapshot.
    pub fn len(&self) -> usize {
        self.floats.len()
    }

    /// Look up a float by identifier.
    pub fn get(&self, float_id: i64) -> Option<&EnrichedFloat> {
        self.floats.iter().find(|f| f.float_id() == float_id)
    }
}

impl Default for FleetSnapshot {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}
