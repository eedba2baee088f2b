use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use super::models::ErrorResponse;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Screenshot is required")]
    MissingFile,

    #[error("Screenshot size exceeds maximum allowed ({mb}MB)", mb = .0 / (1024 * 1024))]
    FileTooLarge(u64),

    #[error("Invalid file format. Only image/png is supported")]
    InvalidFormat,

    #[error("Screenshot ID is required")]
    MissingId,

    #[error("Screenshot not found")]
    NotFound,

    #[error("Storage operation failed: {0}")]
    Storage(String),

    #[error("Failed to process upload: {0}")]
    Upload(String),

    #[error("Failed to retrieve screenshot: {0}")]
    Retrieval(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile
            | ApiError::FileTooLarge(_)
            | ApiError::InvalidFormat
            | ApiError::MissingId => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Storage(_)
            | ApiError::Upload(_)
            | ApiError::Retrieval(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MissingFile => "MISSING_FILE",
            ApiError::FileTooLarge(_) => "FILE_TOO_LARGE",
            ApiError::InvalidFormat => "INVALID_FORMAT",
            ApiError::MissingId => "MISSING_ID",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Storage(_) => "STORAGE_ERROR",
            ApiError::Upload(_) => "UPLOAD_ERROR",
            ApiError::Retrieval(_) => "RETRIEVAL_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::FileTooLarge { max, .. } => ApiError::FileTooLarge(max),
            StorageError::InvalidFormat(_) => ApiError::InvalidFormat,
            StorageError::PutFailed(source) => ApiError::Storage(source.to_string()),
            StorageError::MetadataEncoding(source) => ApiError::Storage(source.to_string()),
            StorageError::Backend(message) => ApiError::Storage(message),
        }
    }
}
