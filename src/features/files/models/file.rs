use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for a tracked file
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct FileRecord {
    pub id: i64,
    /// Client-supplied name, display only
    pub original_filename: String,
    /// Generated on-disk name, unique across all records
    pub system_filename: String,
    /// Size in bytes as measured on disk
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Values for a record that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub original_filename: String,
    pub system_filename: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
}
