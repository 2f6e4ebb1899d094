//! Outcome records returned by the import/export operations.
//!
//! Every variant of failure ends up here as data. A record with
//! `success == false` and no `error` is a user cancellation.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::preview::ImportPreviewData;
use crate::error::QbError;

/// Outcome of a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackupResult {
    #[must_use]
    pub fn ok(backup_path: PathBuf) -> Self {
        Self {
            success: true,
            backup_path: Some(backup_path),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &QbError) -> Self {
        Self {
            success: false,
            backup_path: None,
            error: Some(error.user_message()),
        }
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub button_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    #[must_use]
    pub fn ok(file_path: PathBuf, button_count: usize) -> Self {
        Self {
            success: true,
            file_path: Some(file_path),
            button_count,
            error: None,
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            success: false,
            file_path: None,
            button_count: 0,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &QbError) -> Self {
        Self {
            error: Some(error.user_message()),
            ..Self::cancelled()
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.success && self.error.is_none()
    }
}

/// Outcome of an import or a confirmed preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub imported_count: usize,
    #[serde(default)]
    pub conflicts_resolved: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResult {
    #[must_use]
    pub fn ok(imported_count: usize, conflicts_resolved: usize, backup_path: PathBuf) -> Self {
        Self {
            success: true,
            imported_count,
            conflicts_resolved,
            backup_path: Some(backup_path),
            error: None,
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            success: false,
            imported_count: 0,
            conflicts_resolved: 0,
            backup_path: None,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &QbError) -> Self {
        Self {
            error: Some(error.user_message()),
            ..Self::cancelled()
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.success && self.error.is_none()
    }
}

/// Outcome of a preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<ImportPreviewData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PreviewResult {
    #[must_use]
    pub fn ok(preview: ImportPreviewData) -> Self {
        Self {
            success: true,
            preview: Some(preview),
            error: None,
        }
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self {
            success: false,
            preview: None,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(error: &QbError) -> Self {
        Self {
            error: Some(error.user_message()),
            ..Self::cancelled()
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        !self.success && self.error.is_none()
    }
}
