//! Application configuration.
//!
//! Settings are layered: built-in defaults, then the optional TOML file at
//! [`AppConfig::config_path`], then `BGVR_*` environment variables.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::manifest::{ManifestCodec, ParseMode, MANIFEST_FILE_NAME};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR_NAME: &str = "bgvr";

const DEFAULT_CONFIG: &str = r#"# Board Games VR editor settings

# Directory scanned for .libitem assets.
library_root = "."

# Name of the manifest file written next to each asset.
manifest_file_name = "manifest.asset"

# When true, loading malformed manifest text reports an error instead of
# resetting the manifest to defaults.
strict_parse = false
"#;

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory scanned for library item assets.
    pub library_root: PathBuf,
    /// File name used by the Save action.
    pub manifest_file_name: String,
    /// Report parse failures instead of substituting a default manifest.
    pub strict_parse: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            library_root: PathBuf::from("."),
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
            strict_parse: false,
        }
    }
}

impl AppConfig {
    /// Location of the user configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join("config.toml")
    }

    /// Load settings from the default file location and the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load settings from `path` (which may be missing) and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let settings = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("BGVR"))
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: AppConfig = settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Parse policy selected by `strict_parse`.
    pub fn parse_mode(&self) -> ParseMode {
        if self.strict_parse {
            ParseMode::Strict
        } else {
            ParseMode::Lenient
        }
    }

    /// Codec honouring the configured parse policy.
    pub fn codec(&self) -> ManifestCodec {
        ManifestCodec::new(self.parse_mode())
    }
}

/// Write the commented default configuration if no file exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    let path = AppConfig::config_path();
    write_default_config(&path)?;
    Ok(path)
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "Wrote default config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = AppConfig::load_from(dir.path().join("absent.toml"))?;
        assert_eq!(config.manifest_file_name, MANIFEST_FILE_NAME);
        assert_eq!(config.parse_mode(), ParseMode::Lenient);
        Ok(())
    }

    #[test]
    fn default_template_matches_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bgvr").join("config.toml");
        write_default_config(&path)?;
        assert!(path.is_file());

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.library_root, AppConfig::default().library_root);
        assert_eq!(config.manifest_file_name, MANIFEST_FILE_NAME);
        assert!(!config.strict_parse);
        Ok(())
    }

    #[test]
    fn file_values_override_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "library_root = \"/srv/games\"\nstrict_parse = true\nmanifest_file_name = \"game.json\"\n",
        )?;

        let config = AppConfig::load_from(&path)?;
        assert_eq!(config.library_root, PathBuf::from("/srv/games"));
        assert_eq!(config.manifest_file_name, "game.json");
        assert_eq!(config.codec().mode(), ParseMode::Strict);
        Ok(())
    }

    #[test]
    fn existing_file_is_left_alone() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "strict_parse = true\n")?;
        write_default_config(&path)?;
        assert_eq!(fs::read_to_string(&path)?, "strict_parse = true\n");
        Ok(())
    }
}
