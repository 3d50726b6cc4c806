//! Error types surfaced by the manifest codec.

use thiserror::Error;

/// Failure converting between a manifest record and its JSON text.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The text is not a valid manifest document.
    #[error("failed to parse manifest: {0}")]
    Parse(#[source] serde_json::Error),

    /// The record could not be written as JSON.
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ManifestError>;
