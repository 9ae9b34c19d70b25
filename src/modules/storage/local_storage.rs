//! Local filesystem storage
//!
//! All uploads live in a single flat directory. Writes never replace an
//! existing entry, and a freshly written file stays owned by a
//! [`PendingFile`] until its metadata is committed.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::FileError;
use crate::modules::storage::path_guard::PathGuard;
use crate::modules::storage::preview::{preview_file, FilePreview};

/// Flat-directory file storage rooted at a canonical path
#[derive(Debug, Clone)]
pub struct LocalStorage {
    guard: PathGuard,
}

impl LocalStorage {
    /// Open storage at `root`, creating the directory if needed
    pub fn new(root: &Path) -> io::Result<Self> {
        std::fs::create_dir_all(root)?;
        let guard = PathGuard::new(root)?;

        info!("Local storage initialized at: {}", guard.root().display());

        Ok(Self { guard })
    }

    pub fn from_config(config: &StorageConfig) -> io::Result<Self> {
        Self::new(&config.upload_dir)
    }

    /// Canonical storage root
    pub fn root(&self) -> &Path {
        self.guard.root()
    }

    /// Write `data` to a new file named `system_filename`.
    ///
    /// The file is created exclusively; an existing entry with that name is a
    /// `GenerationConflict` and is left untouched. On success the returned
    /// [`PendingFile`] removes the file again unless it is committed.
    pub async fn write_new(
        &self,
        system_filename: &str,
        data: &[u8],
    ) -> Result<PendingFile, FileError> {
        let path = self.guard.candidate(system_filename)?;

        // Created synchronously so no await point sits between the file
        // appearing on disk and the guard taking ownership of it.
        let file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FileError::GenerationConflict(system_filename.to_string()));
            }
            Err(source) => {
                return Err(FileError::StorageWriteFailed {
                    system_filename: system_filename.to_string(),
                    source,
                });
            }
        };

        // From here on the guard owns the path, so a failed or cancelled
        // write cannot leave a partial file behind.
        let mut pending = PendingFile::new(path);
        let mut file = tokio::fs::File::from_std(file);

        let written = async {
            file.write_all(data).await?;
            file.sync_all().await?;
            file.metadata().await
        }
        .await;
        // Close the handle before the guard may remove the path.
        drop(file);

        let written = written.map_err(|source| FileError::StorageWriteFailed {
            system_filename: system_filename.to_string(),
            source,
        })?;

        pending.size = written.len();
        debug!(
            "File written to storage: {} ({} bytes)",
            system_filename, pending.size
        );

        Ok(pending)
    }

    /// Resolve a stored file, refusing anything outside the storage root
    pub fn resolve(&self, system_filename: &str) -> Result<PathBuf, FileError> {
        self.guard.resolve(system_filename)
    }

    /// Resolve and preview a stored file
    pub async fn preview(&self, system_filename: &str) -> Result<FilePreview, FileError> {
        let path = self.resolve(system_filename)?;
        preview_file(&path).await.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FileError::FileMissingOnDisk(system_filename.to_string()),
            _ => FileError::Io(e),
        })
    }
}

/// A written file whose metadata has not been committed yet.
///
/// Dropping it without calling [`PendingFile::commit`] deletes the file.
#[derive(Debug)]
pub struct PendingFile {
    path: Option<PathBuf>,
    size: u64,
}

impl PendingFile {
    fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            size: 0,
        }
    }

    /// Size of the file as measured on disk after the write
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn path(&self) -> &Path {
        self.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Keep the file; its metadata record exists now.
    pub fn commit(mut self) -> PathBuf {
        self.path.take().unwrap_or_default()
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            match std::fs::remove_file(&path) {
                Ok(()) => warn!("Rolled back uncommitted file: {}", path.display()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(
                    "Failed to roll back uncommitted file {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}
