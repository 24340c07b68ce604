//! HTTP-backed data source.
//!
//! Each load runs as a background task (listing, enrichment, count) and
//! hands its result back over a channel, so `poll()` never blocks the TUI.

use std::fmt;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use floatwatch_types::FleetSnapshot;

use super::DataSource;
use crate::data::{load_fleet, FleetQuery, FloatBackend};

type LoadResult = Result<FleetSnapshot, String>;

/// A data source that loads fleet snapshots from the backend on demand.
///
/// The first load starts on construction; [`DataSource::refresh`] starts
/// another one unless a load is already running.
pub struct HttpSource {
    backend: Arc<dyn FloatBackend>,
    query: FleetQuery,
    runtime: Handle,
    tx: mpsc::Sender<LoadResult>,
    receiver: mpsc::Receiver<LoadResult>,
    description: String,
    loading: bool,
    last_error: Option<String>,
}

impl HttpSource {
    /// Create a source and start the first load.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(backend: Arc<dyn FloatBackend>, query: FleetQuery, description: &str) -> Self {
        Self::with_runtime(backend, query, description, Handle::current())
    }

    /// Create a source whose loads run on the given runtime.
    pub fn with_runtime(
        backend: Arc<dyn FloatBackend>,
        query: FleetQuery,
        description: &str,
        runtime: Handle,
    ) -> Self {
        let (tx, receiver) = mpsc::channel(16);
        let mut source = Self {
            backend,
            query,
            runtime,
            tx,
            receiver,
            description: format!("http: {}", description),
            loading: false,
            last_error: None,
        };
        source.start_load();
        source
    }

    fn start_load(&mut self) {
        let backend = self.backend.clone();
        let query = self.query.clone();
        let tx = self.tx.clone();

        self.loading = true;
        self.runtime.spawn(async move {
            let result = load_fleet(backend.as_ref(), &query).await.map_err(|e| {
                warn!("Fleet load failed: {}", e);
                format!("Failed to load floats: {}", e)
            });
            if tx.send(result).await.is_err() {
                debug!("Fleet load finished after the source was dropped");
            }
        });
    }
}

impl DataSource for HttpSource {
    fn poll(&mut self) -> Option<FleetSnapshot> {
        let mut latest = None;
        while let Ok(result) = self.receiver.try_recv() {
            self.loading = false;
            match result {
                Ok(snapshot) => {
                    self.last_error = None;
                    latest = Some(snapshot);
                }
                Err(e) => self.last_error = Some(e),
            }
        }
        latest
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.start_load();
        true
    }

    fn is_loading(&self) -> bool {
        self.loading
    }
}

impl fmt::Debug for HttpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpSource")
            .field("description", &self.description)
            .field("query", &self.query)
            .field("loading", &self.loading)
            .field("last_error", &self.last_error)
            .finish()
    }
}
