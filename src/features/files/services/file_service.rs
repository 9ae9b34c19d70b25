use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::FileError;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::FileMetadataStore;
use crate::modules::storage::{generate_system_filename, FilePreview, LocalStorage};

/// A stored file together with a preview of its content
#[derive(Debug, Clone)]
pub struct FileInspection {
    pub record: FileRecord,
    pub preview: FilePreview,
}

/// Service for file operations
///
/// Couples the on-disk content with its metadata record: a file is only kept
/// once its record is committed, and records are only created after the file
/// is fully written.
pub struct FileService {
    store: Arc<dyn FileMetadataStore>,
    storage: Arc<LocalStorage>,
}

impl FileService {
    pub fn new(store: Arc<dyn FileMetadataStore>, storage: Arc<LocalStorage>) -> Self {
        Self { store, storage }
    }

    /// Store an uploaded file and record its metadata
    ///
    /// # Arguments
    /// * `original_filename` - The client-supplied filename, if any
    /// * `data` - The file content as bytes
    ///
    /// # Returns
    /// The committed file record
    ///
    /// # Errors
    /// - `MissingFilename` / `EmptyPayload` for invalid input, nothing is written
    /// - `StorageWriteFailed` / `GenerationConflict` if the file cannot be created
    /// - `MetadataCommitFailed` if the record cannot be inserted; the written
    ///   file has been removed by then
    pub async fn ingest(
        &self,
        original_filename: Option<&str>,
        data: &[u8],
    ) -> Result<FileRecord, FileError> {
        let original_filename = match original_filename {
            Some(name) if !name.is_empty() => name,
            _ => return Err(FileError::MissingFilename),
        };
        if data.is_empty() {
            return Err(FileError::EmptyPayload);
        }

        let system_filename = generate_system_filename(original_filename);

        // Dropping `pending` on any early return below deletes the file.
        let pending = self.storage.write_new(&system_filename, data).await?;
        debug!(
            "Stored {} as {}",
            original_filename,
            pending.path().display()
        );

        let file_size = i64::try_from(pending.size()).map_err(|_| {
            FileError::StorageWriteFailed {
                system_filename: system_filename.clone(),
                source: std::io::Error::other("file size exceeds i64"),
            }
        })?;

        let record = self
            .store
            .insert(NewFileRecord {
                original_filename: original_filename.to_string(),
                system_filename: system_filename.clone(),
                file_size,
                uploaded_at: Utc::now(),
            })
            .await
            .map_err(|source| {
                warn!(
                    "Metadata commit failed for {}, removing stored file: {}",
                    system_filename, source
                );
                FileError::MetadataCommitFailed {
                    system_filename: system_filename.clone(),
                    source: Box::new(source),
                }
            })?;

        pending.commit();

        info!(
            "File uploaded: id={}, original={}, system={}, size={}",
            record.id, record.original_filename, record.system_filename, record.file_size
        );

        Ok(record)
    }

    /// List all file records, most recent first
    pub async fn list(&self) -> Result<Vec<FileRecord>, FileError> {
        self.store.list().await
    }

    /// Look up a file record and preview its stored content
    ///
    /// # Errors
    /// - `NotFound` if no record has this id
    /// - `PathEscape` if the recorded name resolves outside the storage root
    /// - `FileMissingOnDisk` if the record exists but its file does not
    pub async fn inspect(&self, id: i64) -> Result<FileInspection, FileError> {
        let record = self
            .store
            .get_by_id(id)
            .await?
            .ok_or(FileError::NotFound(id))?;

        let preview = self.storage.preview(&record.system_filename).await?;

        Ok(FileInspection { record, preview })
    }
}
