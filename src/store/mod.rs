//! Collaborators of the import/export engine: the live configuration store,
//! the file system and file selection prompts.

mod config_store;
mod dialog;
mod fs;

pub use config_store::{ConfigStore, JsonConfigStore, ScopeDocument};
pub use dialog::{FileDialog, OpenDialogOptions, PresetDialog, SaveDialogOptions};
pub use fs::{FileStat, FileSystem, LocalFileSystem};
