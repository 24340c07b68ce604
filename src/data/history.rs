//! Recent probe outcomes for the backend view.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use floatwatch_types::ConnectionState;

/// Maximum number of probe outcomes to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// A completed probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeRecord {
    pub at: DateTime<Utc>,
    pub connected: bool,
}

/// Rolling window of completed probes.
///
/// Fed from successive [`ConnectionState`] observations; a probe is recorded
/// once, when the completed-probe counter moves.
#[derive(Debug, Clone, Default)]
pub struct ProbeHistory {
    records: VecDeque<ProbeRecord>,
    last_seen_probes: u64,
}

impl ProbeHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome in `state` if it is a probe not seen before.
    ///
    /// Returns true if something was recorded.
    pub fn observe(&mut self, state: &ConnectionState) -> bool {
        if state.probes == self.last_seen_probes {
            return false;
        }
        self.last_seen_probes = state.probes;

        let (Some(connected), Some(at)) = (state.status.as_bool(), state.last_checked) else {
            return false;
        };

        self.records.push_back(ProbeRecord { at, connected });
        if self.records.len() > MAX_HISTORY_SIZE {
            self.records.pop_front();
        }
        true
    }

    /// Recorded probes, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &ProbeRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fraction of recorded probes that succeeded.
    ///
    /// Returns None if nothing has been recorded.
    pub fn uptime(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let up = self.records.iter().filter(|r| r.connected).count();
        Some(up as f64 / self.records.len() as f64)
    }

    /// The most recent `width` outcomes as a strip of cells, oldest first.
    pub fn strip(&self, width: usize) -> Vec<bool> {
        let skip = self.records.len().saturating_sub(width);
        self.records.iter().skip(skip).map(|r| r.connected).collect()
    }

    /// When the backend last answered successfully.
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.records.iter().rev().find(|r| r.connected).map(|r| r.at)
    }
}
