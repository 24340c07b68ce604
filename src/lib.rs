//! # floatwatch
//!
//! A terminal dashboard and library for Argo float telemetry.
//!
//! The dashboard lists floats from a backend API, resolves each float's most
//! recent position and date from its detail record, and keeps a running
//! liveness verdict for the backend itself.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(normalize)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ├──▶ source   ◀── HttpSource | ChannelSource          │
//! │       │                                                     │
//! │       └──▶ liveness ◀── LivenessMonitor (periodic probe)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Fleet snapshot delivery ([`DataSource`] trait) from the HTTP
//!   backend or an in-process channel
//! - **[`data`]**: Latest-observation normalization, enrichment and fleet loads
//! - **[`liveness`]**: Periodic backend health probing with an observable state
//! - **[`settings`]**: Layered configuration
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch the default backend at http://localhost:8000
//! floatwatch
//!
//! # Another backend, more floats
//! floatwatch --api-url http://argo.example.org:8000 --limit 20
//!
//! # One probe, exit code reflects the verdict
//! floatwatch --check
//! ```
//!
//! ### Normalizing a details record
//!
//! ```
//! use floatwatch::normalize;
//! use serde_json::json;
//!
//! let details = json!({
//!     "profiles": [
//!         { "latitude": 10.0, "longitude": 70.0, "date": "2024-01-01" },
//!         { "latitude": 11.0, "longitude": 71.0, "date": "2024-03-01" },
//!     ]
//! });
//!
//! let latest = normalize(&details);
//! assert_eq!(latest.lat, Some(11.0));
//! assert_eq!(latest.date.as_deref(), Some("2024-03-01"));
//! ```
//!
//! ### Monitoring backend liveness
//!
//! ```no_run
//! use std::time::Duration;
//! use floatwatch::LivenessMonitor;
//! use floatwatch_client::FloatClient;
//!
//! # tokio_test::block_on(async {
//! let client = FloatClient::builder().base_url("http://localhost:8000").build().unwrap();
//! let monitor = LivenessMonitor::builder(client)
//!     .interval(Duration::from_secs(30))
//!     .build();
//!
//! let mut state = monitor.subscribe();
//! let handle = monitor.activate();
//! state.changed().await.unwrap();
//! println!("{}", state.borrow().status.label());
//! handle.deactivate();
//! # });
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use floatwatch::{App, ChannelSource};
//! use floatwatch_types::ConnectionState;
//! use tokio::sync::watch;
//!
//! let (tx, source) = ChannelSource::create("test fleet");
//! let (_state_tx, state_rx) = watch::channel(ConnectionState::default());
//! let app = App::new(Box::new(source), state_rx, "http://localhost:8000");
//! ```

pub mod app;
pub mod data;
pub mod events;
pub mod liveness;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, ExportDocument, View};
pub use data::{load_fleet, normalize, FleetQuery, FloatBackend};
pub use liveness::{HealthProbe, LivenessMonitor, MonitorHandle};
pub use settings::Settings;
pub use source::{ChannelSource, DataSource, HttpSource};
