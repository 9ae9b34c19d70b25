use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FilePreviewDto, FileResponseDto, UploadFileDto};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, Meta};

/// Largest accepted file content in bytes
#[derive(Debug, Clone, Copy)]
pub struct UploadLimit(pub usize);

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    }
}

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field. The content is
/// stored under a generated name and its metadata recorded.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file, more than one file, missing filename or empty file"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Storage or database failure")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    Extension(UploadLimit(max_upload_size)): Extension<UploadLimit>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                if upload.is_some() {
                    return Err(AppError::BadRequest(
                        "Only one file may be uploaded per request".to_string(),
                    ));
                }
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                if data.len() > max_upload_size {
                    return Err(AppError::PayloadTooLarge(format!(
                        "File exceeds the maximum upload size of {} bytes",
                        max_upload_size
                    )));
                }
                upload = Some((file_name, data.to_vec()));
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let record = service.ingest(file_name.as_deref(), &data).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(record.into()),
            Some("File uploaded successfully".to_string()),
            None,
        )),
    ))
}

/// List all uploaded files
///
/// Most recent uploads come first.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "List of files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 500, description = "Database failure")
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let files: Vec<FileResponseDto> = service
        .list()
        .await?
        .into_iter()
        .map(FileResponseDto::from)
        .collect();
    let total = files.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Get a file with a preview of its content
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FilePreviewDto>),
        (status = 400, description = "Invalid file path"),
        (status = 404, description = "File not found in database or on disk")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FilePreviewDto>>> {
    let inspection = service.inspect(id).await?;
    Ok(Json(ApiResponse::success(Some(inspection.into()), None, None)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::routes::routes;
    use crate::modules::storage::LocalStorage;
    use crate::shared::test_helpers::memory_file_store;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use tempfile::TempDir;

    async fn server() -> (TempDir, TestServer) {
        let dir = TempDir::new().unwrap();
        let storage = Arc::new(LocalStorage::new(&dir.path().join("uploads")).unwrap());
        let service = Arc::new(FileService::new(
            Arc::new(memory_file_store().await),
            storage,
        ));
        let server = TestServer::new(routes(service, 1024 * 1024)).unwrap();
        (dir, server)
    }

    fn file_form(name: &str, content: &[u8]) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(content.to_vec())
                .file_name(name)
                .mime_type("application/octet-stream"),
        )
    }

    #[tokio::test]
    async fn test_upload_list_and_get() {
        let (_dir, server) = server().await;

        let response = server
            .post("/upload")
            .multipart(file_form("hello.txt", b"hello world"))
            .await;
        response.assert_status(StatusCode::CREATED);
        let uploaded: ApiResponse<FileResponseDto> = response.json();
        assert!(uploaded.success);
        assert_eq!(
            uploaded.message.as_deref(),
            Some("File uploaded successfully")
        );
        let uploaded = uploaded.data.unwrap();
        assert_eq!(uploaded.original_filename, "hello.txt");
        assert_eq!(uploaded.file_size, 11);

        let listed: ApiResponse<Vec<FileResponseDto>> = server.get("/files").await.json();
        assert_eq!(listed.meta.unwrap().total, 1);
        assert_eq!(listed.data.unwrap()[0].id, uploaded.id);

        let response = server.get(&format!("/files/{}", uploaded.id)).await;
        response.assert_status_ok();
        let detail = response.json::<ApiResponse<FilePreviewDto>>().data.unwrap();
        assert_eq!(detail.file_id, uploaded.id);
        assert_eq!(detail.filename, uploaded.system_filename);
        assert_eq!(detail.preview, "hello world");
        assert_eq!(detail.preview_size, 11);
        assert!(!detail.is_truncated);
    }

    #[tokio::test]
    async fn test_list_is_most_recent_first() {
        let (_dir, server) = server().await;

        for name in ["one.txt", "two.txt", "three.txt"] {
            server
                .post("/upload")
                .multipart(file_form(name, name.as_bytes()))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let listed: ApiResponse<Vec<FileResponseDto>> = server.get("/files").await.json();
        let names: Vec<String> = listed
            .data
            .unwrap()
            .into_iter()
            .map(|f| f.original_filename)
            .collect();
        assert_eq!(names, vec!["three.txt", "two.txt", "one.txt"]);
    }

    #[tokio::test]
    async fn test_upload_empty_file_is_rejected() {
        let (dir, server) = server().await;

        let response = server
            .post("/upload")
            .multipart(file_form("empty.txt", b""))
            .expect_failure()
            .await;
        response.assert_status_bad_request();

        let listed: ApiResponse<Vec<FileResponseDto>> = server.get("/files").await.json();
        assert_eq!(listed.meta.unwrap().total, 0);
        assert_eq!(
            std::fs::read_dir(dir.path().join("uploads")).unwrap().count(),
            0
        );
    }

    #[tokio::test]
    async fn test_upload_without_file_field() {
        let (_dir, server) = server().await;

        let form = MultipartForm::new().add_text("note", "no file here");
        let response = server.post("/upload").multipart(form).expect_failure().await;
        response.assert_status_bad_request();
        let body: ApiResponse<()> = response.json();
        assert_eq!(body.message.as_deref(), Some("File is required"));
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_rejected() {
        let (_dir, server) = server().await;

        let response = server
            .post("/upload")
            .multipart(file_form("big.bin", &vec![0u8; 2 * 1024 * 1024]))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_upload_just_over_limit_is_rejected() {
        let (dir, server) = server().await;

        // Fits in the request body allowance but not in the file limit
        let response = server
            .post("/upload")
            .multipart(file_form("edge.bin", &vec![7u8; 1024 * 1024 + 1]))
            .expect_failure()
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            std::fs::read_dir(dir.path().join("uploads")).unwrap().count(),
            0
        );

        server
            .post("/upload")
            .multipart(file_form("fits.bin", &vec![7u8; 1024 * 1024]))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_upload_with_two_file_fields_is_rejected() {
        let (_dir, server) = server().await;

        let form = file_form("first.txt", b"first").add_part(
            "file",
            Part::bytes(b"second".to_vec())
                .file_name("second.txt")
                .mime_type("text/plain"),
        );
        let response = server.post("/upload").multipart(form).expect_failure().await;
        response.assert_status_bad_request();
        let body: ApiResponse<()> = response.json();
        assert_eq!(
            body.message.as_deref(),
            Some("Only one file may be uploaded per request")
        );

        let listed: ApiResponse<Vec<FileResponseDto>> = server.get("/files").await.json();
        assert_eq!(listed.meta.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_get_unknown_file() {
        let (_dir, server) = server().await;

        let response = server.get("/files/42").expect_failure().await;
        response.assert_status_not_found();
        let body: ApiResponse<()> = response.json();
        assert!(!body.success);
        assert_eq!(body.message.as_deref(), Some("File not found in database"));
    }

    #[tokio::test]
    async fn test_get_truncated_preview() {
        let (_dir, server) = server().await;

        let uploaded: ApiResponse<FileResponseDto> = server
            .post("/upload")
            .multipart(file_form("large.log", &[b'l'; 5000]))
            .await
            .json();
        let id = uploaded.data.unwrap().id;

        let detail = server
            .get(&format!("/files/{}", id))
            .await
            .json::<ApiResponse<FilePreviewDto>>()
            .data
            .unwrap();
        assert!(detail.is_truncated);
        assert_eq!(detail.preview_size, 1000);
    }
}
