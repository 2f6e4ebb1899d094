//! Export, import and reconciliation of button configurations.
//!
//! # Usage
//!
//! ```ignore
//! use qb::transfer::{ImportExportManager, ImportStrategy};
//!
//! let manager = ImportExportManager::new(store, fs, dialog, &storage_root);
//!
//! // Two-phase import: show the diff, then commit it
//! let preview = manager.preview_import(scope, Some(&path)).await;
//! if let Some(preview) = preview.preview {
//!     let result = manager.confirm_import(preview, scope, ImportStrategy::Merge).await;
//!     println!("imported {} buttons", result.imported_count);
//! }
//! ```

mod analysis;
mod backup;
mod format;
mod manager;
mod preview;
mod results;
mod strategy;

pub use analysis::{
    ButtonSource, ConflictingButton, ImportAnalysis, ModifiedButton, ShortcutConflict,
    analyze_import_changes, detect_shortcut_conflicts,
};
pub use backup::{BACKUP_DIR_NAME, BackupEntry, BackupManager, backup_file_name, parse_backup_file_name};
pub use format::{ExportFormat, FORMAT_VERSION, file_safe_timestamp, timestamp_now, validate_import_data};
pub use manager::{
    ImportExportManager, ImportStage, MAX_IMPORT_FILE_SIZE, default_export_file_name,
    read_import_file,
};
pub use preview::{ImportPreviewData, PREVIEW_EXPIRY_SECS, preview_expiry};
pub use results::{BackupResult, ExportResult, ImportResult, PreviewResult};
pub use strategy::{ImportStrategy, Reconciliation, merge_buttons, replace_buttons};
