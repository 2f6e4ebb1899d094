//! Import/export orchestration.
//!
//! An import runs `validating → backing-up → analyzing → reconciling →
//! writing`. Any failure stops the run and comes back as a result record;
//! side effects of earlier stages (such as a finished backup) stay in place.
//! The configuration store is never written unless the backup succeeded.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, trace, warn};

use super::analysis::analyze_import_changes;
use super::backup::BackupManager;
use super::format::{ExportFormat, file_safe_timestamp, validate_import_data};
use super::preview::ImportPreviewData;
use super::results::{ExportResult, ImportResult, PreviewResult};
use super::strategy::ImportStrategy;
use crate::button::{Button, ConfigurationTarget, ensure_ids_in_array, strip_ids_in_array};
use crate::error::{QbError, Result};
use crate::store::{ConfigStore, FileDialog, FileSystem, OpenDialogOptions, SaveDialogOptions};

/// Largest import file accepted, checked before the file is read.
pub const MAX_IMPORT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Stages of a single import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStage {
    Validating,
    BackingUp,
    Analyzing,
    Reconciling,
    Writing,
    Done,
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::BackingUp => "backing-up",
            Self::Analyzing => "analyzing",
            Self::Reconciling => "reconciling",
            Self::Writing => "writing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

struct Committed {
    imported_count: usize,
    conflicts_resolved: usize,
    backup_path: PathBuf,
}

/// Failure of a commit, tagged with the stage it happened in.
struct StageError {
    stage: ImportStage,
    error: QbError,
}

impl StageError {
    fn at(stage: ImportStage) -> impl FnOnce(QbError) -> Self {
        move |error| Self { stage, error }
    }
}

/// Export, import, preview and confirm over a configuration store.
pub struct ImportExportManager {
    store: Arc<dyn ConfigStore>,
    fs: Arc<dyn FileSystem>,
    dialog: Arc<dyn FileDialog>,
    backups: BackupManager,
}

impl ImportExportManager {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        fs: Arc<dyn FileSystem>,
        dialog: Arc<dyn FileDialog>,
        storage_root: &Path,
    ) -> Self {
        let backups = BackupManager::new(Arc::clone(&fs), storage_root);
        Self {
            store,
            fs,
            dialog,
            backups,
        }
    }

    #[must_use]
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Write the live buttons of `scope` to a user-chosen export file.
    #[instrument(skip(self), fields(scope = %scope))]
    pub async fn export_configuration(&self, scope: ConfigurationTarget) -> ExportResult {
        match self.run_export(scope).await {
            Ok(Some((path, count))) => {
                info!(path = %path.display(), buttons = count, "Configuration exported");
                ExportResult::ok(path, count)
            }
            Ok(None) => {
                debug!("Export cancelled");
                ExportResult::cancelled()
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                ExportResult::failed(&e)
            }
        }
    }

    async fn run_export(&self, scope: ConfigurationTarget) -> Result<Option<(PathBuf, usize)>> {
        let buttons = self.store.buttons_for_scope(scope).await?;
        let payload = ExportFormat::new(&buttons, scope);
        let json = payload.to_json()?;

        let options = SaveDialogOptions {
            title: "Export Button Configuration".to_string(),
            default_file_name: default_export_file_name(scope, &payload.exported_at),
        };
        let Some(path) = self.dialog.show_save_dialog(&options).await else {
            return Ok(None);
        };

        self.fs.write_file(&path, &json).await?;
        Ok(Some((path, payload.buttons.len())))
    }

    /// Import a file into `scope`, prompting for it when `file` is `None`.
    #[instrument(skip(self), fields(scope = %scope, strategy = %strategy))]
    pub async fn import_configuration(
        &self,
        scope: ConfigurationTarget,
        file: Option<&Path>,
        strategy: ImportStrategy,
    ) -> ImportResult {
        let Some(path) = self.resolve_import_file(file).await else {
            debug!("Import cancelled");
            return ImportResult::cancelled();
        };

        trace!(stage = %ImportStage::Validating, "Import stage");
        let payload = match self.read_import_file(&path).await {
            Ok(payload) => payload,
            Err(e) => return Self::aborted(ImportStage::Validating, &e),
        };
        let imported = ingest(&payload.buttons);

        match self.commit(scope, imported, strategy).await {
            Ok(done) => Self::completed(done),
            Err(StageError { stage, error }) => Self::aborted(stage, &error),
        }
    }

    /// Validate a file and diff it against `scope` without writing anything.
    #[instrument(skip(self), fields(scope = %scope))]
    pub async fn preview_import(
        &self,
        scope: ConfigurationTarget,
        file: Option<&Path>,
    ) -> PreviewResult {
        let Some(path) = self.resolve_import_file(file).await else {
            debug!("Preview cancelled");
            return PreviewResult::cancelled();
        };

        match self.build_preview(scope, path).await {
            Ok(preview) => {
                info!(
                    added = preview.analysis.added.len(),
                    modified = preview.analysis.modified.len(),
                    unchanged = preview.analysis.unchanged.len(),
                    conflicts = preview.analysis.shortcut_conflicts.len(),
                    "Import preview ready"
                );
                PreviewResult::ok(preview)
            }
            Err(e) => {
                warn!(error = %e, "Preview failed");
                PreviewResult::failed(&e)
            }
        }
    }

    async fn build_preview(
        &self,
        scope: ConfigurationTarget,
        path: PathBuf,
    ) -> Result<ImportPreviewData> {
        let payload = self.read_import_file(&path).await?;
        let buttons = ingest(&payload.buttons);
        let existing = self.store.buttons_for_scope(scope).await?;
        let analysis = analyze_import_changes(&existing, &buttons);

        Ok(ImportPreviewData {
            buttons,
            analysis,
            file_uri: path,
            source_target: payload.configuration_target,
            target_scope: scope,
            timestamp: Utc::now(),
        })
    }

    /// Commit a preview into `scope`, which must be the scope it was computed for.
    #[instrument(skip(self, preview), fields(scope = %scope, strategy = %strategy))]
    pub async fn confirm_import(
        &self,
        preview: ImportPreviewData,
        scope: ConfigurationTarget,
        strategy: ImportStrategy,
    ) -> ImportResult {
        if preview.is_expired(Utc::now()) {
            return Self::aborted(ImportStage::Validating, &QbError::PreviewExpired);
        }
        if preview.target_scope != scope {
            let err = QbError::ScopeMismatch {
                expected: preview.target_scope,
                actual: scope,
            };
            return Self::aborted(ImportStage::Validating, &err);
        }

        let imported = ensure_ids_in_array(&preview.buttons);
        match self.commit(scope, imported, strategy).await {
            Ok(done) => Self::completed(done),
            Err(StageError { stage, error }) => Self::aborted(stage, &error),
        }
    }

    /// Backup, reconcile and write. Shared tail of import and confirm.
    async fn commit(
        &self,
        scope: ConfigurationTarget,
        imported: Vec<Button>,
        strategy: ImportStrategy,
    ) -> std::result::Result<Committed, StageError> {
        trace!(stage = %ImportStage::BackingUp, "Import stage");
        let existing = self
            .store
            .buttons_for_scope(scope)
            .await
            .map_err(StageError::at(ImportStage::BackingUp))?;

        let backup = self.backups.create_backup(&existing, scope).await;
        let backup_path = match (backup.success, backup.backup_path) {
            (true, Some(path)) => path,
            _ => {
                let reason = backup.error.unwrap_or_else(|| "Unknown error".to_string());
                return Err(StageError::at(ImportStage::BackingUp)(QbError::Backup(reason)));
            }
        };

        trace!(stage = %ImportStage::Analyzing, "Import stage");
        let analysis = analyze_import_changes(&existing, &imported);

        trace!(stage = %ImportStage::Reconciling, "Import stage");
        let reconciled = strategy.apply(&existing, &imported, &analysis);

        trace!(stage = %ImportStage::Writing, "Import stage");
        self.store
            .write_buttons(&reconciled.buttons, scope)
            .await
            .map_err(|e| StageError::at(ImportStage::Writing)(QbError::Write(e.user_message())))?;
        self.store
            .write_configuration_target(scope)
            .await
            .map_err(|e| StageError::at(ImportStage::Writing)(QbError::Write(e.user_message())))?;

        trace!(stage = %ImportStage::Done, "Import stage");
        Ok(Committed {
            imported_count: imported.len(),
            conflicts_resolved: reconciled.conflicts_resolved,
            backup_path,
        })
    }

    async fn resolve_import_file(&self, file: Option<&Path>) -> Option<PathBuf> {
        match file {
            Some(path) => Some(path.to_path_buf()),
            None => {
                self.dialog
                    .show_open_dialog(&OpenDialogOptions::default())
                    .await
            }
        }
    }

    async fn read_import_file(&self, path: &Path) -> Result<ExportFormat> {
        read_import_file(self.fs.as_ref(), path).await
    }

    fn completed(done: Committed) -> ImportResult {
        info!(
            imported = done.imported_count,
            conflicts_resolved = done.conflicts_resolved,
            backup = %done.backup_path.display(),
            "Import completed"
        );
        ImportResult::ok(done.imported_count, done.conflicts_resolved, done.backup_path)
    }

    fn aborted(stage: ImportStage, error: &QbError) -> ImportResult {
        warn!(stage = %stage, error = %error, "Import aborted");
        ImportResult::failed(error)
    }
}

/// Size-check, read and validate an import file.
///
/// Files over [`MAX_IMPORT_FILE_SIZE`] are rejected before any byte is read.
pub async fn read_import_file(fs: &dyn FileSystem, path: &Path) -> Result<ExportFormat> {
    let stat = fs.stat(path).await?;
    if stat.size > MAX_IMPORT_FILE_SIZE {
        return Err(QbError::FileTooLarge {
            size: stat.size,
            limit: MAX_IMPORT_FILE_SIZE,
        });
    }

    let raw = fs.read_file(path).await?;
    let payload = validate_import_data(&raw)?;
    debug!(
        path = %path.display(),
        buttons = payload.buttons.len(),
        source = %payload.configuration_target,
        "Import file validated"
    );
    Ok(payload)
}

/// Incoming buttons enter the live model with fresh identifiers only.
fn ingest(buttons: &[Button]) -> Vec<Button> {
    ensure_ids_in_array(&strip_ids_in_array(buttons))
}

/// Suggested export file name for `scope` at `timestamp`.
#[must_use]
pub fn default_export_file_name(scope: ConfigurationTarget, timestamp: &str) -> String {
    format!("buttons-{scope}-{}.json", file_safe_timestamp(timestamp))
}
