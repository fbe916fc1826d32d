//! Error types for registry loading.

use plugin_registry_core::ManifestError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    /// The source answered with a failure status (or the local file is
    /// missing or unreadable).
    #[error("Failed to fetch {location}: {status}")]
    Fetch { location: String, status: StatusCode },

    /// The registry body is not a well-formed manifest.
    #[error("Malformed registry document: {0}")]
    Parse(#[from] ManifestError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid plugin name: {0:?}")]
    InvalidPluginName(String),

    #[error("Invalid loader configuration: {0}")]
    InvalidConfig(String),

    #[error("Document is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl LoaderError {
    /// Status carried by a [`LoaderError::Fetch`].
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Result type for loader operations.
pub type LoaderResult<T> = std::result::Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_carries_status_text() {
        let err = LoaderError::Fetch {
            location: "https://example.com/marketplace.json".to_string(),
            status: StatusCode::NOT_FOUND,
        };

        assert_eq!(
            err.to_string(),
            "Failed to fetch https://example.com/marketplace.json: 404 Not Found"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_parse_error_wraps_manifest_error() {
        let err = LoaderError::from(ManifestError::MissingPlugins);
        assert!(err.to_string().starts_with("Malformed registry document"));
        assert_eq!(err.status(), None);
    }
}
