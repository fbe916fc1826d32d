//! Error types for registry manifest decoding.

use thiserror::Error;

/// Errors that can occur while decoding a registry manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The document is not valid JSON, or an entry has the wrong shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The top level of the document is not a JSON object.
    #[error("Registry document must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// The document has no `plugins` field.
    #[error("Registry document is missing the `plugins` field")]
    MissingPlugins,
}

/// Result type for manifest operations.
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;
