//! Error types for the backend client.

use thiserror::Error;

/// Errors that can occur when talking to the float backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The backend answered with a non-success status.
    #[error("API returned status {0}")]
    Status(u16),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Connection failed.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Timeout waiting for response.
    #[error("Request timed out")]
    Timeout,

    /// The base URL or an endpoint could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// Check if the error happened below the HTTP status line.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ClientError::Http(_) | ClientError::Connection(_) | ClientError::Timeout
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_connect() {
            ClientError::Connection(err.to_string())
        } else if err.is_decode() {
            ClientError::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status.as_u16())
        } else {
            ClientError::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ClientError::Status(503).to_string(), "API returned status 503");
        assert_eq!(ClientError::Timeout.to_string(), "Request timed out");
    }

    #[test]
    fn test_is_transport() {
        assert!(ClientError::Timeout.is_transport());
        assert!(ClientError::Connection("refused".into()).is_transport());
        assert!(!ClientError::Status(500).is_transport());
        assert!(!ClientError::Parse("eof".into()).is_transport());
    }

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ClientError::from(err), ClientError::Parse(_)));
    }
}
