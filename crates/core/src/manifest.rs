//! JSON codec for library item manifests.
//!
//! Manifests are written as pretty-printed JSON with snake_case keys, in
//! field declaration order, so saved files diff cleanly. Reading follows one
//! of two policies: [`ParseMode::Strict`] reports malformed input, while
//! [`ParseMode::Lenient`] swallows the failure and yields a default manifest.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    error::{ManifestError, Result},
    models::LibraryItemManifest,
};

/// File name of the saved manifest, written next to its owning asset.
pub const MANIFEST_FILE_NAME: &str = "manifest.asset";

/// How parse failures are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Any failure yields [`LibraryItemManifest::default`] and a logged warning.
    #[default]
    Lenient,
    /// Failures are returned to the caller.
    Strict,
}

/// Serializer/deserializer pair bound to a parse policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestCodec {
    mode: ParseMode,
}

impl ManifestCodec {
    /// Build a codec using the given parse policy.
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    /// Codec that reports parse failures.
    pub fn strict() -> Self {
        Self::new(ParseMode::Strict)
    }

    /// Codec that replaces unparseable input with a default manifest.
    pub fn lenient() -> Self {
        Self::new(ParseMode::Lenient)
    }

    /// Active parse policy.
    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Serialize a manifest. Every record is accepted, including ones that
    /// fail validation.
    pub fn encode(&self, manifest: &LibraryItemManifest) -> Result<String> {
        to_manifest_string(manifest)
    }

    /// Parse manifest text according to the active policy. Lenient codecs
    /// never return `Err`.
    pub fn decode(&self, text: &str) -> Result<LibraryItemManifest> {
        match self.mode {
            ParseMode::Strict => from_manifest_str(text),
            ParseMode::Lenient => Ok(from_manifest_str_or_default(text)),
        }
    }
}

/// Serialize a manifest as pretty-printed snake_case JSON.
pub fn to_manifest_string(manifest: &LibraryItemManifest) -> Result<String> {
    serde_json::to_string_pretty(manifest).map_err(ManifestError::Serialize)
}

/// Parse manifest text, returning the parse error on failure.
pub fn from_manifest_str(text: &str) -> Result<LibraryItemManifest> {
    serde_json::from_str(text).map_err(ManifestError::Parse)
}

/// Parse manifest text, falling back to a default manifest on any failure.
pub fn from_manifest_str_or_default(text: &str) -> LibraryItemManifest {
    match from_manifest_str(text) {
        Ok(manifest) => manifest,
        Err(err) => {
            warn!("Discarding unparseable manifest ({err}); using defaults");
            LibraryItemManifest::default()
        }
    }
}
