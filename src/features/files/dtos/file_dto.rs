use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::FileRecord;
use crate::features::files::services::FileInspection;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for file records
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Unique identifier for the file
    pub id: i64,
    /// Original filename as uploaded
    pub original_filename: String,
    /// Generated name the file is stored under
    pub system_filename: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Timestamp when the file was uploaded
    pub uploaded_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            original_filename: file.original_filename,
            system_filename: file.system_filename,
            file_size: file.file_size,
            uploaded_at: file.uploaded_at,
        }
    }
}

/// Response DTO for a single file with a content preview
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FilePreviewDto {
    pub file_id: i64,
    /// Generated name the file is stored under
    pub filename: String,
    pub original_filename: String,
    pub file_size: i64,
    pub uploaded_at: DateTime<Utc>,
    /// Leading content of the file decoded as text (at most 1000 characters)
    pub preview: String,
    /// Number of characters in `preview`
    pub preview_size: usize,
    /// Whether the file is larger than the 4096-byte preview window
    pub is_truncated: bool,
}

impl From<FileInspection> for FilePreviewDto {
    fn from(inspection: FileInspection) -> Self {
        let FileInspection { record, preview } = inspection;
        Self {
            file_id: record.id,
            filename: record.system_filename,
            original_filename: record.original_filename,
            file_size: record.file_size,
            uploaded_at: record.uploaded_at,
            preview: preview.preview,
            preview_size: preview.preview_size,
            is_truncated: preview.is_truncated,
        }
    }
}
