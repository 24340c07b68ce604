//! # floatwatch-types
//!
//! Core types shared by the floatwatch client, the dashboard and anyone
//! embedding them. This crate defines the shape of float summaries as the
//! backend lists them, the normalized "latest observation" extracted from
//! loosely structured float details, and the liveness state of the backend.
//!
//! ## Features
//!
//! - `serde`: JSON serialization via serde (the backend speaks JSON, so the
//!   client crate always enables it)
//!
//! ## Example
//!
//! ```rust
//! use floatwatch_types::{EnrichedFloat, FloatSummary, NormalizedObservation};
//!
//! let summary = FloatSummary::builder(2902746)
//!     .project_name("ARGO INDIA")
//!     .deployment(Some(12.0), Some(77.0), Some("2021-03-01"))
//!     .build();
//!
//! let latest = NormalizedObservation {
//!     lat: Some(12.5),
//!     lon: None,
//!     date: Some("2024-01-01".to_string()),
//! };
//!
//! let float = EnrichedFloat::with_observation(summary, &latest);
//! assert_eq!(float.latest_lat, Some(12.5));
//! assert_eq!(float.latest_lon, Some(77.0)); // deployment fallback
//! ```

mod connection;
mod fleet;
mod float;
mod observation;

pub use connection::*;
pub use fleet::*;
pub use float::*;
pub use observation::*;
