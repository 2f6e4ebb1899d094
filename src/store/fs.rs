//! File system access used by backups, imports and the JSON store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use crate::error::{Result, ResultExt};

/// Metadata needed before reading an untrusted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
}

/// Asynchronous file system operations.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn exists(&self, path: &Path) -> bool;

    /// Create a directory and its parents. Succeeds if it already exists.
    async fn create_directory(&self, path: &Path) -> Result<()>;

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()>;

    async fn read_file(&self, path: &Path) -> Result<String>;

    async fn remove_file(&self, path: &Path) -> Result<()>;

    async fn stat(&self, path: &Path) -> Result<FileStat>;

    /// Entries of a directory, in no particular order.
    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// [`FileSystem`] backed by `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        trace!(path = %path.display(), "Creating directory");
        tokio::fs::create_dir_all(path)
            .await
            .with_context(|| format!("Failed to create directory {}", path.display()))
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<()> {
        trace!(path = %path.display(), bytes = contents.len(), "Writing file");
        tokio::fs::write(path, contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        trace!(path = %path.display(), "Reading file");
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        trace!(path = %path.display(), "Removing file");
        tokio::fs::remove_file(path)
            .await
            .with_context(|| format!("Failed to remove {}", path.display()))
    }

    async fn stat(&self, path: &Path) -> Result<FileStat> {
        let meta = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        Ok(FileStat { size: meta.len() })
    }

    async fn list_directory(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(path)
            .await
            .with_context(|| format!("Failed to list {}", path.display()))?;

        let mut paths = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .with_context(|| format!("Failed to list {}", path.display()))?
        {
            paths.push(entry.path());
        }
        Ok(paths)
    }
}
