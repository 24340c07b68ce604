//! HTTP client for the float backend.
//!
//! ## Example
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
//!     for float in client.floats(6).await? {
//!         let details = client.float_details(float.float_id).await?;
//!         println!("{}: {}", float.float_id, details);
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use floatwatch_types::{FloatListing, FloatSummary};

use crate::api::{build_url, endpoints, DEFAULT_BASE_URL};
use crate::ClientError;

/// Answer to a successful liveness probe.
///
/// The status line decided the verdict already. The body has not been read
/// yet; [`HealthReply::body`] reads it on a best-effort basis and a failure
/// there does not affect the verdict.
pub struct HealthReply {
    /// HTTP status code (always 2xx).
    pub status: u16,
    body: BoxFuture<'static, Result<Value, ClientError>>,
}

impl HealthReply {
    /// A reply whose body is produced by `body`.
    pub fn new<F>(status: u16, body: F) -> Self
    where
        F: Future<Output = Result<Value, ClientError>> + Send + 'static,
    {
        Self {
            status,
            body: Box::pin(body),
        }
    }

    /// Read and parse the body. May wait as long as the server takes to send it.
    pub async fn body(self) -> Result<Value, ClientError> {
        self.body.await
    }
}

impl fmt::Debug for HealthReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HealthReply")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data_count: Option<u64>,
}

/// Client for the float backend.
///
/// Requests carry no timeout unless one is configured on the builder.
#[derive(Debug, Clone)]
pub struct FloatClient {
    client: Client,
    base_url: String,
}

impl FloatClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> FloatClientBuilder {
        FloatClientBuilder::default()
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL for an endpoint on this backend.
    pub fn url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        build_url(&self.base_url, endpoint, params)
    }

    /// Probe the health endpoint once.
    ///
    /// Returns as soon as the status line is in; the body is left to
    /// [`HealthReply::body`]. Returns `Err` on transport failure or a
    /// non-success status.
    pub async fn health(&self) -> Result<HealthReply, ClientError> {
        let url = self.url(endpoints::HEALTH, &[])?;

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;
        let response = ensure_success(response)?;
        let status = response.status().as_u16();

        Ok(HealthReply::new(status, async move {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice::<Value>(&bytes)?)
        }))
    }

    /// List up to `limit` floats.
    ///
    /// A body without a `floats` key is an empty listing.
    pub async fn floats(&self, limit: usize) -> Result<Vec<FloatSummary>, ClientError> {
        let limit = limit.to_string();
        let url = self.url(endpoints::FLOATS, &[("limit", &limit)])?;

        let response = ensure_success(self.client.get(url).send().await?)?;
        let listing: FloatListing = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        debug!("Listed {} floats", listing.floats.len());
        Ok(listing.floats)
    }

    /// Fetch the raw details object of one float.
    pub async fn float_details(&self, float_id: i64) -> Result<Value, ClientError> {
        let id = float_id.to_string();
        let url = self.url(endpoints::FLOAT_DETAILS, &[("float_id", &id)])?;

        let response = ensure_success(self.client.get(url).send().await?)?;
        let details: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(details)
    }

    /// Run a query and return its `data_count` (0 when absent).
    pub async fn float_count(&self, query: &str) -> Result<u64, ClientError> {
        let url = self.url(endpoints::QUERY, &[])?;

        let response = self
            .client
            .post(url)
            .json(&QueryRequest { query })
            .send()
            .await?;
        let response = ensure_success(response)?;
        let answer: QueryResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        Ok(answer.data_count.unwrap_or(0))
    }
}

fn ensure_success(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status(response.status().as_u16()))
    }
}

/// Builder for FloatClient.
#[derive(Debug, Default)]
pub struct FloatClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl FloatClientBuilder {
    /// Set the backend base URL (default: "http://localhost:8000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set a request timeout (default: none).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set or clear the request timeout.
    pub fn maybe_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<FloatClient, ClientError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        // Fail early on a base URL no endpoint could be joined to
        Url::parse(&base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;

        Ok(FloatClient { client, base_url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = FloatClient::builder().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_builder_custom() {
        let client = FloatClient::builder()
            .base_url("http://argo.local:8080")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://argo.local:8080");
    }

    #[test]
    fn test_builder_rejects_invalid_base_url() {
        let err = FloatClient::builder().base_url("::nope").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_url_for_details() {
        let client = FloatClient::builder().build().unwrap();
        let url = client.url(endpoints::FLOAT_DETAILS, &[("float_id", "2902746")]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/float?float_id=2902746");
    }

    #[test]
    fn test_query_request_shape() {
        let body = serde_json::to_value(QueryRequest { query: "how many floats" }).unwrap();
        assert_eq!(body, serde_json::json!({ "query": "how many floats" }));
    }
}
