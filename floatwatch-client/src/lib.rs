//! # floatwatch-client
//!
//! HTTP client for the Argo float backend consumed by the floatwatch
//! dashboard.
//!
//! ## Endpoints
//!
//! - `GET /health` - liveness; any 2xx means healthy
//! - `GET /floats?limit=N` - float summaries (`{ "floats": [...] }`)
//! - `GET /float?float_id=ID` - float details, an opaque JSON object
//! - `POST /query` - natural-language query, only `data_count` is read
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use floatwatch_client::FloatClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = FloatClient::builder()
//!         .base_url("http://localhost:8000")
//!         .build()?;
//!
//!     match client.health().await {
//!         Ok(reply) => println!("healthy ({})", reply.status),
//!         Err(e) => println!("unhealthy: {}", e),
//!     }
//!
//!     let total = client.float_count("how many floats").await?;
//!     println!("{} floats", total);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod error;

pub use client::{FloatClient, FloatClientBuilder, HealthReply};
pub use error::ClientError;

// Re-export types for convenience
pub use floatwatch_types::{FloatListing, FloatSummary};
