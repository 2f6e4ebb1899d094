//! Live configuration store.
//!
//! # Directory Structure
//!
//! ```text
//! <storage_root>/
//! ├── target.json          # Active configuration target
//! └── scopes/
//!     ├── workspace.json   # ScopeDocument per scope
//!     ├── global.json
//!     └── local.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::fs::FileSystem;
use crate::button::{Button, ButtonSet, ConfigurationTarget, ensure_ids_in_array, ensure_ids_in_set};
use crate::error::{QbError, Result};

/// Read/write access to the live button list of each scope.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Live buttons of `scope`, all carrying identifiers.
    async fn buttons_for_scope(&self, scope: ConfigurationTarget) -> Result<Vec<Button>>;

    async fn write_buttons(&self, buttons: &[Button], scope: ConfigurationTarget) -> Result<()>;

    /// Record `scope` as the active configuration target.
    async fn write_configuration_target(&self, scope: ConfigurationTarget) -> Result<()>;
}

/// Everything stored for one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeDocument {
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub button_sets: Vec<ButtonSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_set: Option<String>,
}

impl ScopeDocument {
    /// Buttons of the active set, or the root buttons when no set is active.
    #[must_use]
    pub fn active_buttons(&self) -> &[Button] {
        self.active_set
            .as_deref()
            .and_then(|name| self.button_sets.iter().find(|s| s.name == name))
            .map_or(self.buttons.as_slice(), |set| set.buttons.as_slice())
    }

    /// Make `name` the active set. `None` switches back to the root buttons.
    pub fn switch_set(&mut self, name: Option<&str>) -> Result<()> {
        match name {
            None => self.active_set = None,
            Some(name) => {
                if !self.button_sets.iter().any(|s| s.name == name) {
                    return Err(QbError::SetNotFound {
                        name: name.to_string(),
                    });
                }
                self.active_set = Some(name.to_string());
            }
        }
        Ok(())
    }

    /// Assign identifiers to every button and set that lacks one.
    fn ensure_ids(self) -> Self {
        Self {
            buttons: ensure_ids_in_array(&self.buttons),
            button_sets: self.button_sets.iter().map(ensure_ids_in_set).collect(),
            active_set: self.active_set,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetDocument {
    configuration_target: ConfigurationTarget,
}

/// [`ConfigStore`] persisting one JSON document per scope.
pub struct JsonConfigStore {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
}

impl JsonConfigStore {
    pub fn new(fs: Arc<dyn FileSystem>, storage_root: &Path) -> Self {
        Self {
            fs,
            root: storage_root.to_path_buf(),
        }
    }

    /// Path of the document for `scope`.
    #[must_use]
    pub fn scope_path(&self, scope: ConfigurationTarget) -> PathBuf {
        self.root.join("scopes").join(format!("{scope}.json"))
    }

    fn target_path(&self) -> PathBuf {
        self.root.join("target.json")
    }

    /// Load a scope document, with identifiers ensured. Missing documents are empty.
    #[instrument(skip(self), fields(scope = %scope))]
    pub async fn load_document(&self, scope: ConfigurationTarget) -> Result<ScopeDocument> {
        let path = self.scope_path(scope);
        if !self.fs.exists(&path).await {
            debug!(path = %path.display(), "No document for scope yet");
            return Ok(ScopeDocument::default());
        }

        let content = self.fs.read_file(&path).await?;
        let doc: ScopeDocument = serde_json::from_str(&content).map_err(|e| {
            QbError::ConfigParse(format!("{}: {e}", path.display()))
        })?;
        Ok(doc.ensure_ids())
    }

    /// Persist a scope document.
    #[instrument(skip(self, doc), fields(scope = %scope, buttons = doc.buttons.len()))]
    pub async fn save_document(&self, scope: ConfigurationTarget, doc: &ScopeDocument) -> Result<()> {
        let path = self.scope_path(scope);
        if let Some(parent) = path.parent() {
            self.fs.create_directory(parent).await?;
        }
        let json = serde_json::to_string_pretty(doc)
            .map_err(|e| QbError::Other(format!("Failed to serialize scope document: {e}")))?;
        self.fs.write_file(&path, &json).await?;
        debug!(path = %path.display(), "Scope document saved");
        Ok(())
    }

    /// Activate button set `name` of `scope` and persist it. `None` goes back
    /// to the root buttons. An unknown name leaves the document untouched.
    #[instrument(skip(self), fields(scope = %scope))]
    pub async fn switch_set(
        &self,
        scope: ConfigurationTarget,
        name: Option<&str>,
    ) -> Result<ScopeDocument> {
        let mut doc = self.load_document(scope).await?;
        doc.switch_set(name)?;
        self.save_document(scope, &doc).await?;
        info!(active_set = name.unwrap_or("(root)"), "Button set switched");
        Ok(doc)
    }

    /// The active configuration target, if one was recorded.
    pub async fn configuration_target(&self) -> Result<Option<ConfigurationTarget>> {
        let path = self.target_path();
        if !self.fs.exists(&path).await {
            return Ok(None);
        }
        let content = self.fs.read_file(&path).await?;
        let doc: TargetDocument = serde_json::from_str(&content)
            .map_err(|e| QbError::ConfigParse(format!("{}: {e}", path.display())))?;
        Ok(Some(doc.configuration_target))
    }
}

#[async_trait]
impl ConfigStore for JsonConfigStore {
    async fn buttons_for_scope(&self, scope: ConfigurationTarget) -> Result<Vec<Button>> {
        Ok(self.load_document(scope).await?.buttons)
    }

    async fn write_buttons(&self, buttons: &[Button], scope: ConfigurationTarget) -> Result<()> {
        let mut doc = self.load_document(scope).await?;
        doc.buttons = ensure_ids_in_array(buttons);
        self.save_document(scope, &doc).await?;
        info!(scope = %scope, buttons = buttons.len(), "Buttons written");
        Ok(())
    }

    async fn write_configuration_target(&self, scope: ConfigurationTarget) -> Result<()> {
        self.fs.create_directory(&self.root).await?;
        let json = serde_json::to_string_pretty(&TargetDocument {
            configuration_target: scope,
        })
        .map_err(|e| QbError::Other(format!("Failed to serialize target: {e}")))?;
        self.fs.write_file(&self.target_path(), &json).await
    }
}
