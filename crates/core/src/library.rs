//! Discovery of library item assets below a project root.

use std::path::{Path, PathBuf};

use anyhow::Result;
use parking_lot::RwLock;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::asset::{LibraryItemAsset, ASSET_EXTENSION};

/// Summary of one asset, as shown in listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryEntry {
    /// Path of the asset file.
    pub path: PathBuf,
    /// File stem of the asset.
    pub name: String,
    /// Manifest id.
    pub id: String,
    /// Manifest title.
    pub title: String,
    /// Result of the board validity predicate.
    pub board_invalid: bool,
    /// Whether a saved manifest file sits next to the asset.
    pub has_saved_manifest: bool,
}

impl LibraryEntry {
    /// Label combining title and asset name.
    pub fn display_name(&self) -> String {
        match self.title.trim() {
            "" => self.name.clone(),
            title => format!("{} · {}", title, self.name),
        }
    }
}

/// Cached listing of the assets under a root directory.
pub struct AssetLibrary {
    inner: RwLock<Inner>,
}

struct Inner {
    root: PathBuf,
    manifest_file_name: String,
    cache: Option<Vec<LibraryEntry>>,
}

impl AssetLibrary {
    /// Build a library rooted at `root`. `manifest_file_name` is the saved
    /// manifest name looked for next to each asset.
    pub fn new(root: impl Into<PathBuf>, manifest_file_name: impl Into<String>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                root: root.into(),
                manifest_file_name: manifest_file_name.into(),
                cache: None,
            }),
        }
    }

    /// Root directory being scanned.
    pub fn root(&self) -> PathBuf {
        self.inner.read().root.clone()
    }

    /// Drop the cached listing so the next call rescans the disk.
    pub fn refresh(&self) {
        self.inner.write().cache = None;
    }

    /// All assets, sorted by path. Scans on first use.
    pub fn entries(&self) -> Result<Vec<LibraryEntry>> {
        if let Some(cache) = self.inner.read().cache.as_ref() {
            return Ok(cache.clone());
        }
        let mut inner = self.inner.write();
        let entries = discover(&inner.root, &inner.manifest_file_name)?;
        inner.cache = Some(entries.clone());
        Ok(entries)
    }

    /// Case-insensitive substring search over id, title and asset name.
    pub fn entries_matching(&self, query: &str) -> Result<Vec<LibraryEntry>> {
        let needle = query.trim().to_lowercase();
        let entries = self.entries()?;
        if needle.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|entry| entry_matches(entry, &needle))
            .collect())
    }
}

/// Whether `entry` matches an already lower-cased `needle`.
pub fn entry_matches(entry: &LibraryEntry, needle: &str) -> bool {
    entry.id.to_lowercase().contains(needle)
        || entry.title.to_lowercase().contains(needle)
        || entry.name.to_lowercase().contains(needle)
}

fn discover(root: &Path, manifest_file_name: &str) -> Result<Vec<LibraryEntry>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable path: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some(ASSET_EXTENSION) {
            continue;
        }

        match LibraryItemAsset::open(entry.path()) {
            Ok(asset) => {
                let has_saved_manifest = asset
                    .manifest_output_path(manifest_file_name)
                    .map(|path| path.is_file())
                    .unwrap_or(false);
                let manifest = asset.manifest();
                entries.push(LibraryEntry {
                    path: asset.path().to_path_buf(),
                    name: asset.name(),
                    id: manifest.id.clone(),
                    title: manifest.title.clone(),
                    board_invalid: manifest.board_config.is_invalid(),
                    has_saved_manifest,
                });
            }
            Err(err) => warn!("Skipping {}: {err:#}", entry.path().display()),
        }
    }

    debug!(root = %root.display(), total = entries.len(), "Discovered library items");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestCodec, MANIFEST_FILE_NAME};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn discovers_assets_recursively() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();

        let mut chess = LibraryItemAsset::create(root.join("chess"), Some("Chess"))?;
        chess.manifest_mut().id = "chess".to_string();
        chess.manifest_mut().title = "Chess".to_string();
        chess.persist()?;
        chess.save_manifest(MANIFEST_FILE_NAME, &ManifestCodec::default())?;

        let mut ludo = LibraryItemAsset::create(root.join("party/ludo"), Some("Ludo"))?;
        ludo.manifest_mut().id = "ludo".to_string();
        ludo.manifest_mut().title = "Ludo".to_string();
        ludo.manifest_mut().board_config.prefab_path = "Boards/Ludo".to_string();
        ludo.persist()?;

        fs::write(root.join("party/broken.libitem"), "{ not json")?;
        fs::write(root.join("party/notes.txt"), "ignore me")?;

        let library = AssetLibrary::new(root, MANIFEST_FILE_NAME);
        let entries = library.entries()?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "chess");
        assert!(entries[0].has_saved_manifest);
        assert!(entries[0].board_invalid);
        assert_eq!(entries[1].title, "Ludo");
        assert!(!entries[1].has_saved_manifest);
        assert_eq!(entries[1].display_name(), "Ludo · Ludo");

        let matches = library.entries_matching("LUD")?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "ludo");
        assert_eq!(library.entries_matching("  ")?.len(), 2);
        Ok(())
    }

    #[test]
    fn listing_is_cached_until_refresh() -> Result<()> {
        let temp = tempdir()?;
        let library = AssetLibrary::new(temp.path(), MANIFEST_FILE_NAME);
        assert!(library.entries()?.is_empty());

        LibraryItemAsset::create(temp.path(), None)?;
        assert!(library.entries()?.is_empty());

        library.refresh();
        assert_eq!(library.entries()?.len(), 1);
        Ok(())
    }

    #[test]
    fn missing_root_is_empty() -> Result<()> {
        let library = AssetLibrary::new("/definitely/not/here", MANIFEST_FILE_NAME);
        assert!(library.entries()?.is_empty());
        Ok(())
    }
}
