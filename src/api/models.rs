//! Wire types for the upload/retrieval protocol
//!
//! The upload endpoint accepts `multipart/form-data` with the image
//! bytes under [`SCREENSHOT_FIELD`] and an optional JSON-encoded
//! metadata string under [`METADATA_FIELD`]. A successful upload
//! answers 201 with an [`UploadResponse`]; every error answers with an
//! [`ErrorResponse`] carrying a stable machine-readable code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Multipart field carrying the PNG payload
pub const SCREENSHOT_FIELD: &str = "screenshot";

/// Multipart field carrying the JSON metadata string
pub const METADATA_FIELD: &str = "metadata";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
