//! Application settings loaded from YAML or TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use super::path::{default_settings_path, default_storage_root, resolve_path};
use crate::button::ConfigurationTarget;
use crate::error::{QbError, Result};
use crate::transfer::ImportStrategy;

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yaml, .yml).
    Yaml,
    /// TOML format (.toml).
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// User settings.
///
/// # Example TOML
///
/// ```toml
/// storage_root = "~/.local/share/quick-buttons"
/// default_scope = "global"
/// default_strategy = "replace"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Storage root for the live store and backups. Defaults to the platform data dir.
    pub storage_root: Option<PathBuf>,
    /// Scope used when a command does not name one.
    pub default_scope: ConfigurationTarget,
    /// Strategy used when an import does not name one.
    pub default_strategy: ImportStrategy,
}

impl Settings {
    /// Storage root with `~` and relative paths resolved against `base_dir`.
    pub fn storage_root(&self, base_dir: &Path) -> Result<PathBuf> {
        match &self.storage_root {
            Some(path) => resolve_path(path, base_dir),
            None => default_storage_root(),
        }
    }
}

/// Load settings from `path`, or from the default location when `None`.
///
/// A missing default file yields default settings; a missing explicit file is an error.
#[instrument]
pub fn load_settings(path: Option<&Path>) -> Result<(Settings, PathBuf)> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_settings_path()?, false),
    };
    let base_dir = path
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);

    if !path.exists() {
        if explicit {
            return Err(QbError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }
        debug!(path = %path.display(), "No settings file, using defaults");
        return Ok((Settings::default(), base_dir));
    }

    let format = ConfigFormat::from_extension(&path).ok_or_else(|| {
        QbError::ConfigParse(format!(
            "Unknown settings format for '{}': expected .yaml, .yml, or .toml",
            path.display()
        ))
    })?;

    let content = std::fs::read_to_string(&path)?;
    let settings = load_settings_from_str(&content, format)?;
    info!(path = %path.display(), "Settings loaded");
    Ok((settings, base_dir))
}

/// Parse settings from a string with a specified format.
pub fn load_settings_from_str(content: &str, format: ConfigFormat) -> Result<Settings> {
    trace!(format = ?format, len = content.len(), "Parsing settings");
    match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| QbError::ConfigParse(format!("YAML: {e}")))
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| QbError::ConfigParse(format!("TOML: {e}")))
        }
    }
}
