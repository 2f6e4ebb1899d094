//! File selection prompts.
//!
//! A `None` answer means the user cancelled; callers treat that as a quiet
//! `success: false`, not as an error.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

/// Options for choosing a file to import.
#[derive(Debug, Clone)]
pub struct OpenDialogOptions {
    pub title: String,
    /// Accepted file extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for OpenDialogOptions {
    fn default() -> Self {
        Self {
            title: "Import Button Configuration".to_string(),
            extensions: vec!["json".to_string()],
        }
    }
}

/// Options for choosing where to write an export.
#[derive(Debug, Clone)]
pub struct SaveDialogOptions {
    pub title: String,
    /// Suggested file name.
    pub default_file_name: String,
}

/// Prompts for file locations.
#[async_trait]
pub trait FileDialog: Send + Sync {
    async fn show_open_dialog(&self, options: &OpenDialogOptions) -> Option<PathBuf>;

    async fn show_save_dialog(&self, options: &SaveDialogOptions) -> Option<PathBuf>;
}

/// Non-interactive [`FileDialog`] answering with pre-supplied paths.
///
/// A save path naming an existing directory is completed with the suggested
/// file name.
#[derive(Debug, Clone, Default)]
pub struct PresetDialog {
    open: Option<PathBuf>,
    save: Option<PathBuf>,
}

impl PresetDialog {
    /// A dialog that cancels every prompt.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::default()
    }

    pub fn with_open(mut self, path: impl Into<PathBuf>) -> Self {
        self.open = Some(path.into());
        self
    }

    pub fn with_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.save = Some(path.into());
        self
    }
}

#[async_trait]
impl FileDialog for PresetDialog {
    async fn show_open_dialog(&self, options: &OpenDialogOptions) -> Option<PathBuf> {
        debug!(title = %options.title, answer = ?self.open, "Open prompt");
        self.open.clone()
    }

    async fn show_save_dialog(&self, options: &SaveDialogOptions) -> Option<PathBuf> {
        let path = self.save.clone()?;
        let is_dir = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        let answer = if is_dir {
            path.join(&options.default_file_name)
        } else {
            path
        };
        debug!(title = %options.title, answer = %answer.display(), "Save prompt");
        Some(answer)
    }
}
