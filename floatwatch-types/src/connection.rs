//! Backend liveness state.

use chrono::{DateTime, Utc};

/// Reachability verdict for the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConnectionStatus {
    /// No probe has completed yet.
    #[default]
    Unknown,
    /// The last probe got a 2xx response.
    Connected,
    /// The last probe failed at the transport level or got a non-2xx status.
    Disconnected,
}

impl ConnectionStatus {
    /// Build a verdict from a probe outcome.
    pub fn from_connected(connected: bool) -> Self {
        if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }

    /// `Some(true)` when connected, `Some(false)` when disconnected.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConnectionStatus::Unknown => None,
            ConnectionStatus::Connected => Some(true),
            ConnectionStatus::Disconnected => Some(false),
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown => "Checking...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
        }
    }
}

/// Observable state of a liveness monitor.
///
/// Starts `Unknown`, not checking and never checked. After the first
/// completed probe the status is always `Connected` or `Disconnected`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectionState {
    pub status: ConnectionStatus,

    /// A probe is in flight.
    pub checking: bool,

    /// Wall-clock completion time of the most recent probe.
    pub last_checked: Option<DateTime<Utc>>,

    /// Number of completed probes.
    pub probes: u64,
}

impl ConnectionState {
    /// Check if the last completed probe succeeded.
    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }

    /// Check if the last completed probe failed.
    pub fn is_disconnected(&self) -> bool {
        self.status == ConnectionStatus::Disconnected
    }
}
