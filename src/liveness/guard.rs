use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use floatwatch_types::{ConnectionState, ConnectionStatus};

/// Marks a probe as in flight for as long as it is alive.
///
/// Dropping the guard stamps `last_checked` whether the probe finished,
/// failed or was cancelled. The status only changes if a verdict was
/// recorded first. `checking` stays set until the last of several
/// overlapping guards is gone.
pub(super) struct ProbeGuard<'a> {
    state: &'a watch::Sender<ConnectionState>,
    in_flight: &'a AtomicUsize,
    verdict: Option<bool>,
}

impl<'a> ProbeGuard<'a> {
    pub(super) fn begin(state: &'a watch::Sender<ConnectionState>, in_flight: &'a AtomicUsize) -> Self {
        // Counter updates happen under the watch lock so they order with the flag
        state.send_modify(|s| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            s.checking = true;
        });
        Self {
            state,
            in_flight,
            verdict: None,
        }
    }

    pub(super) fn record(&mut self, connected: bool) {
        self.verdict = Some(connected);
    }
}

impl Drop for ProbeGuard<'_> {
    fn drop(&mut self) {
        let verdict = self.verdict;
        let in_flight = self.in_flight;
        self.state.send_modify(|s| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
            s.checking = remaining > 0;
            s.last_checked = Some(Utc::now());
            if let Some(connected) = verdict {
                s.status = ConnectionStatus::from_connected(connected);
                s.probes += 1;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_with_verdict() {
        let (tx, rx) = watch::channel(ConnectionState::default());
        let in_flight = AtomicUsize::new(0);
        {
            let mut guard = ProbeGuard::begin(&tx, &in_flight);
            assert!(rx.borrow().checking);
            guard.record(true);
        }
        let state = rx.borrow();
        assert!(!state.checking);
        assert!(state.is_connected());
        assert!(state.last_checked.is_some());
        assert_eq!(state.probes, 1);
    }

    #[test]
    fn test_guard_without_verdict_keeps_status() {
        let (tx, rx) = watch::channel(ConnectionState {
            status: ConnectionStatus::Connected,
            probes: 3,
            ..Default::default()
        });
        let in_flight = AtomicUsize::new(0);
        drop(ProbeGuard::begin(&tx, &in_flight));

        let state = rx.borrow();
        assert!(!state.checking);
        assert!(state.is_connected());
        assert!(state.last_checked.is_some());
        assert_eq!(state.probes, 3);
    }

    #[test]
    fn test_overlapping_guards_keep_checking_until_last_drops() {
        let (tx, rx) = watch::channel(ConnectionState::default());
        let in_flight = AtomicUsize::new(0);

        let mut first = ProbeGuard::begin(&tx, &in_flight);
        let second = ProbeGuard::begin(&tx, &in_flight);

        first.record(false);
        drop(first);
        assert!(rx.borrow().checking);
        assert!(rx.borrow().is_disconnected());

        drop(second);
        let state = rx.borrow();
        assert!(!state.checking);
        assert!(state.is_disconnected());
        assert_eq!(state.probes, 1);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }
}
