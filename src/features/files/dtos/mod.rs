pub mod file_dto;

pub use file_dto::{FilePreviewDto, FileResponseDto, UploadFileDto};
