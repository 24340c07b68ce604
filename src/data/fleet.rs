//! One full fleet load: listing, enrichment, then the total count.

use tracing::{info, warn};

use floatwatch_client::ClientError;
use floatwatch_types::FleetSnapshot;

use super::backend::FloatBackend;
use super::enrich::enrich_all;

/// Default number of floats listed per load.
pub const DEFAULT_FLOAT_LIMIT: usize = 6;

/// Default query used to read the fleet total.
pub const DEFAULT_COUNT_QUERY: &str = "how many floats";

/// Parameters of a fleet load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetQuery {
    /// Maximum number of floats to list.
    pub limit: usize,
    /// Natural-language query answered with the total float count.
    pub count_query: String,
}

impl Default for FleetQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FLOAT_LIMIT,
            count_query: DEFAULT_COUNT_QUERY.to_string(),
        }
    }
}

/// Load a fleet snapshot.
///
/// A failed listing fails the load. Failed detail fetches only leave the
/// affected floats unenriched, and a failed count reads as 0.
pub async fn load_fleet<B>(backend: &B, query: &FleetQuery) -> Result<FleetSnapshot, ClientError>
where
    B: FloatBackend + ?Sized,
{
    let summaries = backend.list_floats(query.limit).await?;
    let floats = enrich_all(backend, summaries).await;

    let total_count = match backend.count_floats(&query.count_query).await {
        Ok(count) => count,
        Err(e) => {
            warn!("Failed to read float count: {}", e);
            0
        }
    };

    info!("Loaded {} floats ({} total)", floats.len(), total_count);
    Ok(FleetSnapshot::new(floats, total_count))
}
