//! Backups of the live configuration taken before any destructive write.
//!
//! # Directory Structure
//!
//! ```text
//! <storage_root>/
//! └── .backup/
//!     ├── backup-workspace-2026-10-18T09-12-44-120Z.json
//!     └── backup-global-2026-10-18T09-30-02-004Z.json
//! ```
//!
//! Backup files use the export format, so any backup can be imported back.
//! A name already taken within the same millisecond gets a `-1`, `-2`, ...
//! suffix.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::format::{ExportFormat, file_safe_timestamp};
use super::results::BackupResult;
use crate::button::{Button, ConfigurationTarget};
use crate::error::Result;
use crate::store::FileSystem;

/// Name of the backup directory under the storage root.
pub const BACKUP_DIR_NAME: &str = ".backup";

const BACKUP_FILE_PREFIX: &str = "backup-";

/// A backup file found on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub scope: ConfigurationTarget,
}

/// Writes and lists backup snapshots.
pub struct BackupManager {
    fs: Arc<dyn FileSystem>,
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new(fs: Arc<dyn FileSystem>, storage_root: &Path) -> Self {
        Self {
            fs,
            backup_dir: storage_root.join(BACKUP_DIR_NAME),
        }
    }

    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Snapshot `buttons` of `scope` to a new backup file.
    ///
    /// Never errors: failures come back as `success: false` with the
    /// underlying message. Nothing written before the failure is cleaned up.
    #[instrument(skip(self, buttons), fields(scope = %scope, buttons = buttons.len()))]
    pub async fn create_backup(&self, buttons: &[Button], scope: ConfigurationTarget) -> BackupResult {
        match self.write_backup(buttons, scope).await {
            Ok(path) => {
                info!(path = %path.display(), "Backup created");
                BackupResult::ok(path)
            }
            Err(e) => {
                warn!(error = %e, "Backup failed");
                BackupResult::failed(&e)
            }
        }
    }

    async fn write_backup(&self, buttons: &[Button], scope: ConfigurationTarget) -> Result<PathBuf> {
        if !self.fs.exists(&self.backup_dir).await {
            debug!(dir = %self.backup_dir.display(), "Creating backup directory");
            self.fs.create_directory(&self.backup_dir).await?;
        }

        let payload = ExportFormat::new(buttons, scope);
        let path = self.free_backup_path(scope, &payload.exported_at).await;
        self.fs.write_file(&path, &payload.to_json()?).await?;
        Ok(path)
    }

    /// First unused backup path for `timestamp`, adding `-1`, `-2`, ... on collision.
    async fn free_backup_path(&self, scope: ConfigurationTarget, timestamp: &str) -> PathBuf {
        let base = backup_file_name(scope, timestamp);
        let mut path = self.backup_dir.join(&base);
        let stem = base.trim_end_matches(".json");
        let mut n = 0u32;
        while self.fs.exists(&path).await {
            n += 1;
            path = self.backup_dir.join(format!("{stem}-{n}.json"));
        }
        if n > 0 {
            debug!(path = %path.display(), "Backup name taken, using suffix");
        }
        path
    }

    /// Backup files in the backup directory, newest first.
    #[instrument(skip(self))]
    pub async fn list_backups(&self) -> Result<Vec<BackupEntry>> {
        if !self.fs.exists(&self.backup_dir).await {
            return Ok(Vec::new());
        }

        let mut entries: Vec<(String, BackupEntry)> = self
            .fs
            .list_directory(&self.backup_dir)
            .await?
            .into_iter()
            .filter_map(|path| {
                let file_name = path.file_name()?.to_str()?.to_string();
                let (scope, stamp) = parse_backup_file_name(&file_name)?;
                Some((
                    stamp,
                    BackupEntry {
                        path,
                        file_name,
                        scope,
                    },
                ))
            })
            .collect();

        entries.sort_by(|a, b| b.0.cmp(&a.0));
        debug!(count = entries.len(), "Listed backups");
        Ok(entries.into_iter().map(|(_, entry)| entry).collect())
    }
}

/// `backup-<scope>-<timestamp with ':' and '.' replaced>.json`
#[must_use]
pub fn backup_file_name(scope: ConfigurationTarget, timestamp: &str) -> String {
    format!(
        "{BACKUP_FILE_PREFIX}{scope}-{}.json",
        file_safe_timestamp(timestamp)
    )
}

/// Split a backup file name into its scope and file-safe timestamp.
#[must_use]
pub fn parse_backup_file_name(file_name: &str) -> Option<(ConfigurationTarget, String)> {
    let rest = file_name
        .strip_prefix(BACKUP_FILE_PREFIX)?
        .strip_suffix(".json")?;
    let (scope, stamp) = rest.split_once('-')?;
    Some((scope.parse().ok()?, stamp.to_string()))
}
