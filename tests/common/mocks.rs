//! In-memory collaborators for driving the import/export manager.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, trace};

use qb::button::{Button, ConfigurationTarget, ensure_ids_in_array};
use qb::error::{QbError, Result};
use qb::store::{ConfigStore, FileStat, FileSystem};

/// Configuration store holding one button list per scope and recording writes.
#[derive(Default)]
pub struct MemoryStore {
    scopes: Mutex<HashMap<ConfigurationTarget, Vec<Button>>>,
    writes: AtomicUsize,
    target: Mutex<Option<ConfigurationTarget>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_buttons(scope: ConfigurationTarget, buttons: Vec<Button>) -> Self {
        let store = Self::default();
        store
            .scopes
            .lock()
            .unwrap()
            .insert(scope, ensure_ids_in_array(&buttons));
        store
    }

    /// A store whose `write_buttons` always fails.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn buttons(&self, scope: ConfigurationTarget) -> Vec<Button> {
        self.scopes
            .lock()
            .unwrap()
            .get(&scope)
            .cloned()
            .unwrap_or_default()
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn configuration_target(&self) -> Option<ConfigurationTarget> {
        *self.target.lock().unwrap()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn buttons_for_scope(&self, scope: ConfigurationTarget) -> Result<Vec<Button>> {
        Ok(self.buttons(scope))
    }

    async fn write_buttons(&self, buttons: &[Button], scope: ConfigurationTarget) -> Result<()> {
        if self.fail_writes {
            return Err(QbError::Other("store is read-only".to_string()));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        debug!(scope = %scope, count = buttons.len(), "MemoryStore write");
        self.scopes
            .lock()
            .unwrap()
            .insert(scope, buttons.to_vec());
        Ok(())
    }

    async fn write_configuration_target(&self, scope: ConfigurationTarget) -> Result<()> {
        *self.target.lock().unwrap() = Some(scope);
        Ok(())
    }
}

/// File system kept in a map, with injectable failures and fake sizes.
#[derive(Default)]
pub struct MemoryFs {
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<Vec<PathBuf>>,
    fake_sizes: Mutex<HashMap<PathBuf, u64>>,
    /// Writes under this directory fail.
    failing_dir: Option<PathBuf>,
    reads: AtomicUsize,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_under(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing_dir = Some(dir.into());
        self
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), contents.into());
    }

    /// Report `size` from `stat` for `path` regardless of its contents.
    pub fn fake_size(&self, path: impl Into<PathBuf>, size: u64) {
        self.fake_sizes.lock().unwrap().insert(path.into(), size);
    }

    pub fn contents(&self, path: &Path) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn paths_under(&self, dir: &Path) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(dir))
            .cloned()
            .collect()
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        match &self.failing_dir {
            Some(dir) if path.starts_with(dir) => Err(QbError::Other(format!(
                "permission denied: {}",
                path.display()
            ))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl FileSystem for MemoryFs {
    async fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
            || self.dirs.lock().unwrap().iter().any(|d| d == path)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        self.dirs.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        self.check_writable(path)?;
        trace!(path = %path.display(), "MemoryFs write");
        self.insert(path, contents);
        Ok(())
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.contents(path)
            .ok_or_else(|| QbError::Other(format!("not found: {}", path.display())))
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        self.check_writable(path)?;
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| QbError::Other(format!("not found: {}", path.display())))
    }

    async fn stat(&self, path: &Path) -> Result<FileStat> {
        if let Some(size) = self.fake_sizes.lock().unwrap().get(path) {
            return Ok(FileStat { size: *size });
        }
        self.contents(path)
            .map(|c| FileStat {
                size: c.len() as u64,
            })
            .ok_or_else(|| QbError::Other(format!("not found: {}", path.display())))
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Ok(self.paths_under(path))
    }
}
