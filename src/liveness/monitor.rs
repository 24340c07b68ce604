//! The liveness state machine and its background task.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use floatwatch_client::{ClientError, HealthReply};
use floatwatch_types::{ConnectionState, ConnectionStatus};

use super::guard::ProbeGuard;
use super::HealthProbe;

/// Default time between periodic probes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

struct Inner {
    probe: Arc<dyn HealthProbe>,
    state: watch::Sender<ConnectionState>,
    in_flight: AtomicUsize,
    listener: Option<Listener>,
    interval: Duration,
}

/// Tracks whether the backend is reachable.
///
/// Cloning is cheap; clones share the same state and probe.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use floatwatch::liveness::LivenessMonitor;
/// use floatwatch_client::FloatClient;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let client = FloatClient::builder().build()?;
/// let monitor = LivenessMonitor::builder(client)
///     .interval(Duration::from_secs(10))
///     .on_change(|connected| println!("backend up: {}", connected))
///     .build();
///
/// let handle = monitor.activate();
/// // ...
/// handle.deactivate();
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LivenessMonitor {
    inner: Arc<Inner>,
}

impl LivenessMonitor {
    /// Create a monitor with the default interval and no listener.
    pub fn new<P: HealthProbe + 'static>(probe: P) -> Self {
        Self::builder(probe).build()
    }

    /// Create a builder around a probe.
    pub fn builder<P: HealthProbe + 'static>(probe: P) -> LivenessMonitorBuilder {
        LivenessMonitorBuilder {
            probe: Arc::new(probe),
            interval: DEFAULT_INTERVAL,
            listener: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.borrow().clone()
    }

    /// Watch the state for changes.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// The configured probe interval.
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Run one probe and return its verdict.
    ///
    /// `checking` is set for the duration of the call and cleared on every
    /// exit, including cancellation of the returned future. A panicking
    /// probe counts as a failed one. The listener is called once the new
    /// state has been published.
    ///
    /// The verdict rests on the status line alone. A healthy reply's body is
    /// read afterwards in a detached task and only logged, so a slow or
    /// stalled body never holds up the verdict or the next probe.
    ///
    /// Calls are not serialized against each other; `checking` stays set
    /// while any of them is in flight. Callers that trigger probes on demand
    /// should skip while it is set.
    pub async fn probe_now(&self) -> bool {
        let previous = self.inner.state.borrow().status;

        let reply = {
            let mut guard = ProbeGuard::begin(&self.inner.state, &self.inner.in_flight);
            let reply = self.run_probe().await;
            guard.record(reply.is_some());
            reply
        };
        let connected = reply.is_some();

        let status = ConnectionStatus::from_connected(connected);
        if status != previous {
            info!("Backend is now {}", status.label().to_lowercase());
        }

        if let Some(listener) = &self.inner.listener {
            listener(connected);
        }

        if let Some(reply) = reply {
            tokio::spawn(read_body(reply));
        }
        connected
    }

    async fn run_probe(&self) -> Option<HealthReply> {
        match AssertUnwindSafe(self.inner.probe.check()).catch_unwind().await {
            Ok(Ok(reply)) => Some(reply),
            Ok(Err(e)) => {
                debug!("Health probe failed: {}", e);
                None
            }
            Err(panic) => {
                error!("Health probe panicked: {}", panic_message(panic.as_ref()));
                None
            }
        }
    }

    /// Start probing in the background: once now, then every interval.
    ///
    /// Probes never overlap; a probe that outlasts the interval delays the
    /// next one instead of triggering a burst. Must be called from within a
    /// tokio runtime.
    ///
    /// Deactivating the returned handle cancels a probe that is still in
    /// flight. Its guard clears `checking` and stamps `last_checked`, but
    /// the status is left as it was and no listener call is made.
    pub fn activate(&self) -> MonitorHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let monitor = self.clone();
        let period = self.inner.interval;

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = ticker.tick() => {
                        tokio::select! {
                            biased;
                            _ = stop_rx.changed() => break,
                            _ = monitor.probe_now() => {}
                        }
                    }
                }
            }
            debug!("Liveness task finished");
        });

        info!("Liveness monitor started (every {:?})", period);
        MonitorHandle { stop_tx, task }
    }
}

impl fmt::Debug for LivenessMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivenessMonitor")
            .field("state", &*self.inner.state.borrow())
            .field("interval", &self.inner.interval)
            .field("listener", &self.inner.listener.is_some())
            .finish()
    }
}

async fn read_body(reply: HealthReply) {
    let status = reply.status;
    match reply.body().await {
        Ok(body) => log_body(status, &body),
        Err(e) => ignore_body_error(&e),
    }
}

fn log_body(status: u16, body: &Value) {
    debug!("Health probe answered {}: {}", status, body);
}

/// A 2xx answer is healthy whatever its body holds.
fn ignore_body_error(err: &ClientError) {
    debug!("Ignoring unreadable health body: {}", err);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Builder for configuring a LivenessMonitor.
pub struct LivenessMonitorBuilder {
    probe: Arc<dyn HealthProbe>,
    interval: Duration,
    listener: Option<Listener>,
}

impl LivenessMonitorBuilder {
    /// Set the time between periodic probes (default: 30s).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Call `listener` with the verdict after every completed probe.
    pub fn on_change<F>(mut self, listener: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.listener = Some(Arc::new(listener));
        self
    }

    /// Build the monitor.
    pub fn build(self) -> LivenessMonitor {
        let (state, _) = watch::channel(ConnectionState::default());
        LivenessMonitor {
            inner: Arc::new(Inner {
                probe: self.probe,
                state,
                in_flight: AtomicUsize::new(0),
                listener: self.listener,
                interval: self.interval,
            }),
        }
    }
}

/// Handle to a running monitor task.
///
/// Dropping the handle deactivates the monitor.
#[derive(Debug)]
pub struct MonitorHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    /// Stop probing. An in-flight probe is cancelled.
    ///
    /// Safe to call more than once.
    pub fn deactivate(&self) {
        let stopped = self.stop_tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });
        if stopped {
            info!("Liveness monitor stopped");
        }
    }

    /// Check if the task is still probing.
    pub fn is_active(&self) -> bool {
        !*self.stop_tx.borrow() && !self.task.is_finished()
    }

    /// Deactivate and wait for the task to exit.
    pub async fn shutdown(mut self) {
        self.deactivate();
        let _ = (&mut self.task).await;
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.deactivate();
    }
}
