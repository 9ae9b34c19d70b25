use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

use crate::core::error::FileError;
use crate::features::files::models::{FileRecord, NewFileRecord};
use crate::features::files::store::FileMetadataStore;

/// SQLite-backed metadata store
#[derive(Debug, Clone)]
pub struct SqliteFileStore {
    pool: SqlitePool,
}

impl SqliteFileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Run embedded database migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl FileMetadataStore for SqliteFileStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord, FileError> {
        let result = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO files (original_filename, system_filename, file_size, uploaded_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, original_filename, system_filename, file_size, uploaded_at
            "#,
        )
        .bind(&record.original_filename)
        .bind(&record.system_filename)
        .bind(record.file_size)
        .bind(record.uploaded_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(file) => {
                debug!(
                    "File metadata inserted: id={}, system_filename={}",
                    file.id, file.system_filename
                );
                Ok(file)
            }
            Err(sqlx::Error::Database(ref db_err)) if db_err.is_unique_violation() => {
                Err(FileError::DuplicateIdentifier(record.system_filename))
            }
            Err(e) => {
                error!("Failed to insert file metadata: {:?}", e);
                Err(FileError::Database(e))
            }
        }
    }

    async fn list(&self) -> Result<Vec<FileRecord>, FileError> {
        let files = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, original_filename, system_filename, file_size, uploaded_at
            FROM files
            ORDER BY uploaded_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to list files: {:?}", e);
            FileError::Database(e)
        })?;

        Ok(files)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>, FileError> {
        let file = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT id, original_filename, system_filename, file_size, uploaded_at
            FROM files
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to get file by id: {:?}", e);
            FileError::Database(e)
        })?;

        Ok(file)
    }
}
