//! Error types at the infrastructure seams
//!
//! [`FetchError`] is always absorbed (logged, then treated as null or an
//! empty listing). [`SeedLoadError`] and [`WriteError`] are fatal to a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network failure for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Timed out after {seconds}s fetching {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("HTTP request failed with status {status}: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Unsupported content type '{content_type}' for {url}")]
    UnsupportedContent { url: String, content_type: String },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Connect, timeout and body-read failures, as opposed to a server answer
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. } | Self::Body { .. })
    }
}

#[derive(Error, Debug)]
pub enum SeedLoadError {
    #[error("Failed to read seed list {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed list {path:?} is not a JSON array of objects: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Failed to serialize dataset for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_classification() {
        let timeout = FetchError::Timeout {
            url: "https://example.com/a".to_string(),
            seconds: 30,
        };
        assert!(timeout.is_network());

        let status = FetchError::HttpStatus {
            url: "https://example.com/b".to_string(),
            status: 404,
        };
        assert!(!status.is_network());
        assert_eq!(
            status.to_string(),
            "HTTP request failed with status 404: https://example.com/b"
        );
    }
}
