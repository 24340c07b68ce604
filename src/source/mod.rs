//! Data source abstraction for receiving fleet snapshots.
//!
//! The TUI never awaits anything itself; it polls a [`DataSource`] once per
//! frame and renders whatever snapshot arrived last.

mod channel;
mod http;

pub use channel::ChannelSource;
pub use http::HttpSource;

use std::fmt::Debug;

use floatwatch_types::FleetSnapshot;

/// Trait for receiving fleet snapshots from various sources.
///
/// # Example
///
/// ```
/// use floatwatch::{ChannelSource, DataSource};
///
/// let (_tx, mut source) = ChannelSource::create("fixture");
/// assert!(source.poll().is_none());
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<FleetSnapshot>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// The error of the last load, if it failed.
    fn error(&self) -> Option<&str>;

    /// Ask for a fresh snapshot.
    ///
    /// Returns false if the source cannot refresh on demand or a load is
    /// already running.
    fn refresh(&mut self) -> bool {
        false
    }

    /// Check if a load is in progress.
    fn is_loading(&self) -> bool {
        false
    }
}
