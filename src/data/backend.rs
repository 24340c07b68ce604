//! The subset of the backend API the fleet loader needs.

use async_trait::async_trait;
use serde_json::Value;

use floatwatch_client::{ClientError, FloatClient, FloatSummary};

/// Read access to float listings, details and counts.
///
/// Implemented by [`FloatClient`]; tests substitute in-memory backends.
#[async_trait]
pub trait FloatBackend: Send + Sync {
    /// List up to `limit` float summaries.
    async fn list_floats(&self, limit: usize) -> Result<Vec<FloatSummary>, ClientError>;

    /// Fetch the raw details object of one float.
    async fn fetch_details(&self, float_id: i64) -> Result<Value, ClientError>;

    /// Run a count query.
    async fn count_floats(&self, query: &str) -> Result<u64, ClientError>;
}

#[async_trait]
impl FloatBackend for FloatClient {
    async fn list_floats(&self, limit: usize) -> Result<Vec<FloatSummary>, ClientError> {
        self.floats(limit).await
    }

    async fn fetch_details(&self, float_id: i64) -> Result<Value, ClientError> {
        self.float_details(float_id).await
    }

    async fn count_floats(&self, query: &str) -> Result<u64, ClientError> {
        self.float_count(query).await
    }
}
