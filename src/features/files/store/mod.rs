//! Metadata store for tracked files
//!
//! The ingestion service only depends on [`FileMetadataStore`], so the
//! database engine can be swapped and tests can inject failing stores.

mod sqlite_store;

use async_trait::async_trait;

use crate::core::error::FileError;
use crate::features::files::models::{FileRecord, NewFileRecord};

pub use sqlite_store::SqliteFileStore;

/// Durable, insert-only table of file records
#[async_trait]
pub trait FileMetadataStore: Send + Sync {
    /// Insert a record and return it with its assigned id.
    ///
    /// Fails with `DuplicateIdentifier` if the system filename is already
    /// recorded. Concurrent inserts of the same name never both succeed.
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, FileError>;

    /// All records, most recent upload first; ties broken by id descending.
    async fn list(&self) -> Result<Vec<FileRecord>, FileError>;

    async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>, FileError>;
}
