//! Merging float summaries with their normalized latest observation.

use futures_util::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use floatwatch_types::{EnrichedFloat, FloatSummary};

use super::backend::FloatBackend;
use super::normalize::normalize;

/// Enrich one summary.
///
/// With details, each latest field is the normalized value or the deployment
/// value. Without details (the fetch failed) the summary passes through with
/// no latest values.
pub fn enrich(summary: FloatSummary, details: Option<&Value>) -> EnrichedFloat {
    match details {
        Some(details) => EnrichedFloat::with_observation(summary, &normalize(details)),
        None => EnrichedFloat::passthrough(summary),
    }
}

/// Fetch details for every summary concurrently and enrich each one.
///
/// All fetches are started before any is awaited and all are awaited, so
/// one slow or failing float never cancels the others. Output order matches
/// input order.
pub async fn enrich_all<B>(backend: &B, summaries: Vec<FloatSummary>) -> Vec<EnrichedFloat>
where
    B: FloatBackend + ?Sized,
{
    let fetches = summaries.iter().map(|s| backend.fetch_details(s.float_id));
    let results = join_all(fetches).await;

    summaries
        .into_iter()
        .zip(results)
        .map(|(summary, result)| match result {
            Ok(details) => {
                debug!("Fetched details for float {}", summary.float_id);
                enrich(summary, Some(&details))
            }
            Err(e) => {
                warn!("Failed to fetch details for float {}: {}", summary.float_id, e);
                enrich(summary, None)
            }
        })
        .collect()
}
