//! Periodic backend liveness checks.
//!
//! A [`LivenessMonitor`] probes the backend once immediately and then on a
//! fixed interval, publishing a [`ConnectionState`] through a watch channel.
//! The probe itself is behind the [`HealthProbe`] trait so the state machine
//! can be driven without a network.
//!
//! ```text
//!            probe_now()                 drop(ProbeGuard)
//! Unknown ──────────────▶ checking ──────────────────────▶ Connected
//!                                  │                       Disconnected
//!                                  └── cancelled: status unchanged,
//!                                      checking cleared, time stamped
//! ```
//!
//! [`ConnectionState`]: floatwatch_types::ConnectionState

mod guard;
mod monitor;

pub use monitor::{LivenessMonitor, LivenessMonitorBuilder, MonitorHandle, DEFAULT_INTERVAL};

use async_trait::async_trait;

use floatwatch_client::{ClientError, FloatClient, HealthReply};

/// A single liveness probe.
///
/// `Ok` means the backend answered with a success status; the body may
/// still carry a read error, which does not affect the verdict.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<HealthReply, ClientError>;
}

#[async_trait]
impl HealthProbe for FloatClient {
    async fn check(&self) -> Result<HealthReply, ClientError> {
        self.health().await
    }
}
