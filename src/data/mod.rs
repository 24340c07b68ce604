//! Fleet loading and telemetry normalization.
//!
//! ## Submodules
//!
//! - [`normalize`]: latest position/date extraction from raw float details
//! - [`timestamp`]: the date formats accepted as valid
//! - [`backend`]: the [`FloatBackend`] seam over the HTTP client
//! - [`enrich`]: concurrent detail fetches merged into summaries
//! - [`fleet`]: a complete load, listing through count
//! - [`history`]: recent probe outcomes for the backend view
//!
//! ## Data Flow
//!
//! ```text
//! GET /floats ──▶ Vec<FloatSummary>
//!                      │
//!                      ├──▶ GET /float?float_id=… (all at once)
//!                      │         │
//!                      │         ▼
//!                      │    normalize() ──▶ NormalizedObservation
//!                      ▼
//!                 enrich_all() ──▶ Vec<EnrichedFloat>
//!                      │
//! POST /query ─────────┴──▶ FleetSnapshot
//! ```

pub mod backend;
pub mod enrich;
pub mod fleet;
pub mod history;
pub mod normalize;
pub mod timestamp;

pub use backend::FloatBackend;
pub use enrich::{enrich, enrich_all};
pub use fleet::{load_fleet, FleetQuery};
pub use history::{ProbeHistory, ProbeRecord};
pub use normalize::normalize;
pub use timestamp::{is_valid_timestamp, parse_calendar_date, parse_timestamp};
