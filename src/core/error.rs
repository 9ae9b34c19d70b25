use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiResponse;

/// Failures of the file ingestion and inspection core
#[derive(Debug, Error)]
pub enum FileError {
    #[error("No filename provided")]
    MissingFilename,

    #[error("Empty file")]
    EmptyPayload,

    #[error("Failed to write file {system_filename}: {source}")]
    StorageWriteFailed {
        system_filename: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored file has already been removed when this is returned
    #[error("Failed to record metadata for {system_filename}: {source}")]
    MetadataCommitFailed {
        system_filename: String,
        #[source]
        source: Box<FileError>,
    },

    #[error("System filename already recorded: {0}")]
    DuplicateIdentifier(String),

    #[error("Generated system filename already exists on disk: {0}")]
    GenerationConflict(String),

    #[error("Invalid file path: {0}")]
    PathEscape(String),

    #[error("File not found in database: {0}")]
    NotFound(i64),

    #[error("File not found on disk: {0}")]
    FileMissingOnDisk(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<FileError> for AppError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::MissingFilename | FileError::EmptyPayload => {
                AppError::BadRequest(err.to_string())
            }
            FileError::PathEscape(ref name) => {
                tracing::warn!("Rejected path outside storage root: {:?}", name);
                AppError::BadRequest("Invalid file path".to_string())
            }
            FileError::NotFound(_) => AppError::NotFound("File not found in database".to_string()),
            FileError::FileMissingOnDisk(ref name) => {
                tracing::warn!("Data integrity: record exists but file is missing: {}", name);
                AppError::NotFound("File not found on disk".to_string())
            }
            FileError::DuplicateIdentifier(_) => AppError::Conflict(err.to_string()),
            FileError::Database(e) => AppError::Database(e),
            FileError::StorageWriteFailed { .. }
            | FileError::MetadataCommitFailed { .. }
            | FileError::GenerationConflict(_)
            | FileError::Io(_) => AppError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::BadRequest(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Conflict(ref msg) => (StatusCode::CONFLICT, msg.clone(), None),
            AppError::PayloadTooLarge(ref msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
