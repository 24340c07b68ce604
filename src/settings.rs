//! Layered configuration.
//!
//! Sources, later ones winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config`)
//! 3. `FLOATWATCH_*` environment variables, e.g. `FLOATWATCH_API_URL`
//! 4. command-line flags, applied by the binary
//!
//! ```toml
//! api_url = "http://argo.example.org:8000"
//! float_limit = 12
//! health_interval_secs = 15
//! request_timeout_secs = 10
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use floatwatch_client::api::DEFAULT_BASE_URL;
use floatwatch_client::{ClientError, FloatClient};

use crate::data::fleet::{DEFAULT_COUNT_QUERY, DEFAULT_FLOAT_LIMIT};
use crate::data::FleetQuery;
use crate::liveness::DEFAULT_INTERVAL;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FLOATWATCH";

/// Resolved dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Backend base URL.
    pub api_url: String,
    /// Number of floats listed per load.
    pub float_limit: usize,
    /// Seconds between liveness probes.
    pub health_interval_secs: u64,
    /// Per-request timeout; none when unset.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Query answered with the total float count.
    pub count_query: String,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Like [`Settings::load`], reading environment variables under `prefix`.
    pub fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("api_url", DEFAULT_BASE_URL)?
            .set_default("float_limit", DEFAULT_FLOAT_LIMIT as i64)?
            .set_default("health_interval_secs", DEFAULT_INTERVAL.as_secs() as i64)?
            .set_default("count_query", DEFAULT_COUNT_QUERY)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        let settings: Settings = config
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values that would make the dashboard misbehave.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.float_limit > 0, "float_limit must be at least 1");
        ensure!(
            self.health_interval_secs > 0,
            "health_interval_secs must be at least 1"
        );
        ensure!(
            self.request_timeout_secs != Some(0),
            "request_timeout_secs must be at least 1 when set"
        );
        Ok(())
    }

    /// Time between liveness probes.
    pub fn health_interval(&self) -> Duration {
        Duration::from_secs(self.health_interval_secs)
    }

    /// Parameters of a fleet load.
    pub fn fleet_query(&self) -> FleetQuery {
        FleetQuery {
            limit: self.float_limit,
            count_query: self.count_query.clone(),
        }
    }

    /// Build a backend client from these settings.
    pub fn client(&self) -> Result<FloatClient, ClientError> {
        FloatClient::builder()
            .base_url(&self.api_url)
            .maybe_timeout(self.request_timeout_secs.map(Duration::from_secs))
            .build()
    }
}
