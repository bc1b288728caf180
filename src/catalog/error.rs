//! Error types for catalog operations.
//!
//! Messages follow the What/Suggestion pattern used across the crate.

use thiserror::Error;

/// Errors returned by a [`CatalogClient`](super::CatalogClient).
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog could not be reached, or answered with a failure status.
    #[error("catalog request for '{target}' failed: {reason}\n  Suggestion: {suggestion}")]
    Network {
        /// The query or volume id being fetched
        target: String,
        /// Why the request failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
        /// HTTP status when the catalog answered at all
        status: Option<u16>,
    },

    /// The catalog has no volume with this id.
    #[error(
        "catalog has no volume with id '{id}'\n  Suggestion: The book may have been withdrawn; remove it from favorites if it no longer resolves"
    )]
    NotFound {
        /// The id that was looked up
        id: String,
    },

    /// The catalog answered but the body was not a volume/volume list.
    #[error(
        "could not decode catalog response for '{target}': {reason}\n  Suggestion: The catalog API may have changed; check the configured base URL"
    )]
    Decode {
        /// The query or volume id being fetched
        target: String,
        /// Parser error text
        reason: String,
    },

    /// The client itself could not be built.
    #[error("catalog client setup failed: {reason}\n  Suggestion: {suggestion}")]
    Setup {
        /// Why setup failed
        reason: String,
        /// How to fix the issue
        suggestion: String,
    },
}

impl CatalogError {
    /// Creates a `Network` error for a transport failure (no HTTP status).
    #[must_use]
    pub fn transport(target: &str, reason: &str) -> Self {
        Self::Network {
            target: target.to_string(),
            reason: reason.to_string(),
            suggestion: "Check your network connection and try again".to_string(),
            status: None,
        }
    }

    /// Creates a `Network` error for a non-success HTTP status.
    #[must_use]
    pub fn http_status(target: &str, status: u16) -> Self {
        let (reason, suggestion) = match status {
            400 => (
                "catalog rejected the request".to_string(),
                "Check the search query; empty queries are not accepted",
            ),
            403 => (
                "catalog refused access".to_string(),
                "Check the configured api_key or daily quota",
            ),
            429 => (
                "catalog rate limit exceeded".to_string(),
                "Wait a few seconds before searching again",
            ),
            s if s >= 500 => (
                format!("catalog unavailable (HTTP {s})"),
                "Try again later",
            ),
            s => (
                format!("catalog returned HTTP {s}"),
                "Check the configured catalog base URL",
            ),
        };
        Self::Network {
            target: target.to_string(),
            reason,
            suggestion: suggestion.to_string(),
            status: Some(status),
        }
    }

    /// Creates a `NotFound` error.
    #[must_use]
    pub fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }

    /// Creates a `Decode` error.
    #[must_use]
    pub fn decode(target: &str, reason: &str) -> Self {
        Self::Decode {
            target: target.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates a `Setup` error.
    #[must_use]
    pub fn setup(reason: &str, suggestion: &str) -> Self {
        Self::Setup {
            reason: reason.to_string(),
            suggestion: suggestion.to_string(),
        }
    }

    /// Returns true for `NotFound`.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_not_found_message() {
        let err = CatalogError::not_found("nonexistent");
        let msg = err.to_string();
        assert!(msg.contains("no volume"));
        assert!(msg.contains("nonexistent"));
        assert!(msg.contains("Suggestion"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_catalog_error_transport_has_no_status() {
        let err = CatalogError::transport("dune", "connection refused");
        match err {
            CatalogError::Network { status, reason, .. } => {
                assert_eq!(status, None);
                assert_eq!(reason, "connection refused");
            }
            other => panic!("Expected Network, got: {other:?}"),
        }
    }

    #[test]
    fn test_catalog_error_http_status_messages() {
        assert!(
            CatalogError::http_status("q", 429)
                .to_string()
                .contains("rate limit")
        );
        assert!(
            CatalogError::http_status("q", 503)
                .to_string()
                .contains("unavailable")
        );
        assert!(
            CatalogError::http_status("q", 418)
                .to_string()
                .contains("HTTP 418")
        );
    }

    #[test]
    fn test_catalog_error_decode_message() {
        let err = CatalogError::decode("abc123", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("could not decode"));
        assert!(msg.contains("abc123"));
        assert!(!err.is_not_found());
    }
}
