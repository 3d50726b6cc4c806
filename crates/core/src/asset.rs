//! Library item assets: the authoring files that own one manifest each.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    error::ManifestError,
    manifest::ManifestCodec,
    models::LibraryItemManifest,
};

/// Extension of library item asset files.
pub const ASSET_EXTENSION: &str = "libitem";

/// Name given to new assets when none is supplied.
pub const DEFAULT_ASSET_NAME: &str = "MyLibraryItem";

/// On-disk layout of an asset file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct AssetPayload {
    #[serde(default)]
    manifest: LibraryItemManifest,
}

/// An authoring asset holding the manifest being edited.
///
/// Edits happen in memory and flip the modified flag; [`persist`](Self::persist)
/// writes the asset itself, while [`save_manifest`](Self::save_manifest)
/// exports the manifest file shipped with the game.
#[derive(Debug, Clone)]
pub struct LibraryItemAsset {
    path: PathBuf,
    manifest: LibraryItemManifest,
    dirty: bool,
}

impl LibraryItemAsset {
    /// Create a new asset with a default manifest inside `dir` and write it
    /// to disk. The name is sanitised and suffixed with a counter when a file
    /// of the same name already exists.
    pub fn create(dir: impl AsRef<Path>, name: Option<&str>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

        let base = name
            .map(sanitize_component)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ASSET_NAME.to_string());
        let path = unique_asset_path(dir, &base);

        let mut asset = Self {
            path,
            manifest: LibraryItemManifest::default(),
            dirty: true,
        };
        asset.persist()?;
        info!(path = %asset.path.display(), "Created library item");
        Ok(asset)
    }

    /// Read an existing asset file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let payload: AssetPayload = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(Self {
            path,
            manifest: payload.manifest,
            dirty: false,
        })
    }

    /// Location of the asset file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File stem shown in listings.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Current manifest.
    pub fn manifest(&self) -> &LibraryItemManifest {
        &self.manifest
    }

    /// Mutable access for in-place edits. Marks the asset modified.
    pub fn manifest_mut(&mut self) -> &mut LibraryItemManifest {
        self.dirty = true;
        &mut self.manifest
    }

    /// Whether there are edits not yet written by [`persist`](Self::persist).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Where [`save_manifest`](Self::save_manifest) writes `file_name`.
    pub fn manifest_output_path(&self, file_name: &str) -> Result<PathBuf> {
        let folder = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("asset {} has no parent directory", self.path.display()))?;
        Ok(folder.join(file_name))
    }

    /// Load action: replace the manifest with the decoded `text` and mark the
    /// asset modified. A lenient codec never fails here.
    pub fn load_manifest_from_str(
        &mut self,
        text: &str,
        codec: &ManifestCodec,
    ) -> std::result::Result<(), ManifestError> {
        let manifest = codec.decode(text)?;
        self.manifest = manifest;
        self.dirty = true;
        Ok(())
    }

    /// Load action reading the source text from `source`.
    pub fn load_manifest_from_file(
        &mut self,
        source: impl AsRef<Path>,
        codec: &ManifestCodec,
    ) -> Result<()> {
        let source = source.as_ref();
        let text = fs::read_to_string(source)
            .with_context(|| format!("failed to read {}", source.display()))?;
        self.load_manifest_from_str(&text, codec)
            .with_context(|| format!("failed to load manifest from {}", source.display()))?;
        info!(
            asset = %self.path.display(),
            source = %source.display(),
            "Loaded manifest"
        );
        Ok(())
    }

    /// Save action: write the serialized manifest as `file_name` in the
    /// asset's directory, replacing any existing file. The directory must
    /// already exist.
    pub fn save_manifest(&self, file_name: &str, codec: &ManifestCodec) -> Result<PathBuf> {
        let target = self.manifest_output_path(file_name)?;
        let serialized = codec.encode(&self.manifest)?;
        fs::write(&target, serialized)
            .with_context(|| format!("failed to write {}", target.display()))?;
        info!(path = %target.display(), "Saved manifest");
        Ok(target)
    }

    /// Write the asset file and clear the modified flag.
    pub fn persist(&mut self) -> Result<()> {
        let payload = AssetPayload {
            manifest: self.manifest.clone(),
        };
        let serialized = serde_json::to_vec_pretty(&payload)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        self.dirty = false;
        Ok(())
    }
}

fn unique_asset_path(dir: &Path, base: &str) -> PathBuf {
    let candidate = dir.join(format!("{base}.{ASSET_EXTENSION}"));
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|counter| dir.join(format!("{base} {counter}.{ASSET_EXTENSION}")))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn sanitize_component(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | ' ') {
            result.push(ch);
        }
    }
    result.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{from_manifest_str, MANIFEST_FILE_NAME};
    use crate::models::{CheckerPieceItem, CheckerType, GameWinRule};
    use tempfile::tempdir;

    fn edit(asset: &mut LibraryItemAsset) {
        let manifest = asset.manifest_mut();
        manifest.id = "checkers-classic".to_string();
        manifest.title = "Checkers".to_string();
        manifest.board_config.prefab_path = "Boards/Checkers8x8".to_string();
        manifest
            .board_config
            .checker_piece_collection
            .push(CheckerPieceItem {
                kind: CheckerType::King,
                prefab_path: "Pieces/RedKing".to_string(),
                player_id: 1,
                use_random_rotation: true,
            });
        manifest.logic_config.player_count = 2;
        manifest.logic_config.game_win_rule = GameWinRule::LastPiecesStanding;
    }

    #[test]
    fn create_names_and_deduplicates() -> Result<()> {
        let dir = tempdir()?;
        let first = LibraryItemAsset::create(dir.path(), None)?;
        let second = LibraryItemAsset::create(dir.path(), None)?;
        let named = LibraryItemAsset::create(dir.path(), Some("  Chess/Variant*  "))?;

        assert_eq!(first.name(), "MyLibraryItem");
        assert_eq!(second.name(), "MyLibraryItem 1");
        assert_eq!(named.name(), "ChessVariant");
        assert!(first.path().exists());
        assert!(!first.is_dirty());
        assert_eq!(first.manifest(), &LibraryItemManifest::default());
        Ok(())
    }

    #[test]
    fn save_then_load_round_trips() -> Result<()> {
        let dir = tempdir()?;
        let mut asset = LibraryItemAsset::create(dir.path(), Some("Checkers"))?;
        edit(&mut asset);
        assert!(asset.is_dirty());

        let codec = ManifestCodec::strict();
        let written = asset.save_manifest(MANIFEST_FILE_NAME, &codec)?;
        assert_eq!(written, dir.path().join("manifest.asset"));
        assert_eq!(fs::read_to_string(&written)?, codec.encode(asset.manifest())?);

        let mut reloaded = LibraryItemAsset::create(dir.path(), Some("Other"))?;
        reloaded.load_manifest_from_file(&written, &ManifestCodec::strict())?;
        assert_eq!(reloaded.manifest(), asset.manifest());
        assert!(reloaded.is_dirty());
        Ok(())
    }

    #[test]
    fn save_overwrites_existing_manifest() -> Result<()> {
        let dir = tempdir()?;
        let mut asset = LibraryItemAsset::create(dir.path(), None)?;
        fs::write(dir.path().join(MANIFEST_FILE_NAME), "stale")?;

        edit(&mut asset);
        let written = asset.save_manifest(MANIFEST_FILE_NAME, &ManifestCodec::default())?;
        let content = fs::read_to_string(written)?;
        assert_eq!(&from_manifest_str(&content)?, asset.manifest());
        Ok(())
    }

    #[test]
    fn save_into_missing_directory_fails() -> Result<()> {
        let dir = tempdir()?;
        let mut asset = LibraryItemAsset::create(dir.path().join("games"), None)?;
        edit(&mut asset);
        fs::remove_dir_all(dir.path().join("games"))?;

        assert!(asset
            .save_manifest(MANIFEST_FILE_NAME, &ManifestCodec::default())
            .is_err());
        Ok(())
    }

    #[test]
    fn persist_and_reopen() -> Result<()> {
        let dir = tempdir()?;
        let mut asset = LibraryItemAsset::create(dir.path(), None)?;
        edit(&mut asset);
        asset.persist()?;
        assert!(!asset.is_dirty());

        let reopened = LibraryItemAsset::open(asset.path())?;
        assert_eq!(reopened.manifest(), asset.manifest());
        assert!(!reopened.is_dirty());
        Ok(())
    }

    #[test]
    fn lenient_load_of_garbage_resets_manifest() -> Result<()> {
        let dir = tempdir()?;
        let mut asset = LibraryItemAsset::create(dir.path(), None)?;
        edit(&mut asset);
        asset.persist()?;

        asset.load_manifest_from_str("{ truncated", &ManifestCodec::lenient())?;
        assert_eq!(asset.manifest(), &LibraryItemManifest::default());
        assert!(asset.is_dirty());

        edit(&mut asset);
        let before = asset.manifest().clone();
        assert!(asset
            .load_manifest_from_str("{ truncated", &ManifestCodec::strict())
            .is_err());
        assert_eq!(asset.manifest(), &before);
        Ok(())
    }

    #[test]
    fn sanitize_keeps_readable_names() {
        assert_eq!(sanitize_component("Hello World!* 18??"), "Hello World 18");
        assert_eq!(sanitize_component("///"), "");
    }
}
