//! Backend endpoint table and URL assembly.

use reqwest::Url;

use crate::ClientError;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Fixed endpoint paths exposed by the float backend.
pub mod endpoints {
    /// Natural-language query (answers with `data_count`).
    pub const QUERY: &str = "/query";
    /// Float listing, takes `limit`.
    pub const FLOATS: &str = "/floats";
    /// Float details, takes `float_id`.
    pub const FLOAT_DETAILS: &str = "/float";
    /// NetCDF profile upload (multipart); the dashboard never calls it.
    pub const UPLOAD_NETCDF: &str = "/upload_netcdf";
    /// Query results as NetCDF; the dashboard never calls it.
    pub const EXPORT_NETCDF: &str = "/export_netcdf";
    /// Query results as CSV; the dashboard never calls it.
    pub const EXPORT_CSV: &str = "/export_csv";
    /// Query results as Parquet; the dashboard never calls it.
    pub const EXPORT_PARQUET: &str = "/export_parquet";
    /// Liveness probe.
    pub const HEALTH: &str = "/health";
}

/// Resolve `endpoint` against `base` and append URL-encoded query parameters.
///
/// The endpoint replaces the base URL's path, the same way a browser
/// resolves an absolute path against a page URL. Parameters keep their order
/// and are `&`-joined after a single `?`; no `?` is added when there are none.
///
/// ```rust
/// use floatwatch_client::api::{build_url, endpoints};
///
/// let url = build_url("http://localhost:8000", endpoints::FLOATS, &[("limit", "6")]).unwrap();
/// assert_eq!(url.as_str(), "http://localhost:8000/floats?limit=6");
/// ```
pub fn build_url(base: &str, endpoint: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
    let base = Url::parse(base).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base, e)))?;
    let mut url = base
        .join(endpoint)
        .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", endpoint, e)))?;

    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_without_params() {
        let url = build_url(DEFAULT_BASE_URL, endpoints::HEALTH, &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/health");
    }

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url(
            "http://api.example.org",
            endpoints::FLOAT_DETAILS,
            &[("float_id", "29 02/746"), ("limit", "6")],
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.example.org/float?float_id=29+02%2F746&limit=6"
        );
    }

    #[test]
    fn test_build_url_replaces_base_path() {
        let url = build_url("http://host:9000/ui/index.html", endpoints::QUERY, &[]).unwrap();
        assert_eq!(url.as_str(), "http://host:9000/query");
    }

    #[test]
    fn test_build_url_for_transfer_endpoints() {
        for (endpoint, path) in [
            (endpoints::UPLOAD_NETCDF, "/upload_netcdf"),
            (endpoints::EXPORT_NETCDF, "/export_netcdf"),
            (endpoints::EXPORT_CSV, "/export_csv"),
            (endpoints::EXPORT_PARQUET, "/export_parquet"),
        ] {
            let url = build_url("http://localhost:8000", endpoint, &[]).unwrap();
            assert_eq!(url.as_str(), format!("http://localhost:8000{}", path));
        }
    }

    #[test]
    fn test_build_url_invalid_base() {
        let err = build_url("not a url", endpoints::HEALTH, &[]).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }
}
