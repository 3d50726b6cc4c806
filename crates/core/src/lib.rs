#![warn(clippy::all, missing_docs)]

//! Core library for the Board Games VR authoring tools.
//!
//! This crate hosts the manifest data model, its JSON codec, advisory rule
//! validation, the library item assets that own manifests, and the
//! configuration used by the editor frontend.

pub mod asset;
pub mod config;
pub mod error;
pub mod library;
pub mod manifest;
pub mod models;
pub mod rules;

pub use asset::LibraryItemAsset;
pub use config::AppConfig;
pub use error::ManifestError;
pub use library::{AssetLibrary, LibraryEntry};
pub use manifest::{ManifestCodec, ParseMode, MANIFEST_FILE_NAME};
pub use models::LibraryItemManifest;
pub use rules::{RuleIssue, RuleReport};
