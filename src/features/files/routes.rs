use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::features::files::handlers::{get_file, list_files, upload_file, UploadLimit};
use crate::features::files::services::FileService;

/// Headroom for multipart boundaries and part headers on top of the file size
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/upload",
            post(upload_file)
                .layer::<_, Infallible>(DefaultBodyLimit::max(max_upload_size + MULTIPART_OVERHEAD))
                .layer(Extension(UploadLimit(max_upload_size))),
        )
        .route("/files", get(list_files))
        .route("/files/{id}", get(get_file))
        .with_state(file_service)
}
