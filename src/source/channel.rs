//! Channel-based data source.
//!
//! Receives fleet snapshots via a tokio watch channel, for embedding the
//! dashboard in a process that loads snapshots itself.

use tokio::sync::watch;

use floatwatch_types::FleetSnapshot;

use super::DataSource;

/// A data source fed through a watch channel.
///
/// # Example
///
/// ```
/// use floatwatch::ChannelSource;
///
/// let (tx, source) = ChannelSource::create("replay");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<FleetSnapshot>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    pub fn new(receiver: watch::Receiver<Option<FleetSnapshot>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Nothing is available until the first snapshot is sent.
    pub fn create(source_description: &str) -> (watch::Sender<Option<FleetSnapshot>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<FleetSnapshot> {
        if self.receiver.has_changed().unwrap_or(false) {
            self.receiver.borrow_and_update().clone()
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatwatch_types::{EnrichedFloat, FloatSummary};

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        // Nothing sent yet
        assert!(source.poll().is_none());

        let floats = vec![EnrichedFloat::passthrough(FloatSummary::builder(1).build())];
        tx.send(Some(FleetSnapshot::new(floats, 10))).unwrap();

        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.total_count, 10);

        // No change, so poll returns None
        assert!(source.poll().is_none());
        assert!(!source.refresh());
    }
}
