//! HTTP upload client for the shotlink server

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::api::models::{METADATA_FIELD, SCREENSHOT_FIELD, UploadResponse};
use crate::config;
use crate::storage::UploadMetadata;

#[derive(Debug, Error)]
enum UploadFailure {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("metadata could not be encoded: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Result of an upload attempt. Failures are reported through
/// `success: false` rather than an error; the caller decides what to
/// tell the user.
#[derive(Debug, Clone, Default)]
pub struct UploadOutcome {
    pub success: bool,
    pub url: Option<String>,
    pub id: Option<String>,
}

#[async_trait]
pub trait Uploader: Send + Sync {
    /// Upload a PNG image with its metadata. Single attempt, no retry.
    async fn upload(&self, image: Bytes, metadata: &UploadMetadata) -> UploadOutcome;
}

/// Multipart upload client posting to `<base>/upload`
pub struct UploadClient {
    http: reqwest::Client,
    base_url: String,
}

impl UploadClient {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("shotlink/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config::normalize_base_url(base_url),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    async fn try_upload(
        &self,
        image: Bytes,
        metadata: &UploadMetadata,
    ) -> Result<UploadResponse, UploadFailure> {
        let metadata_json = serde_json::to_string(metadata)?;

        let part = reqwest::multipart::Part::bytes(image.to_vec())
            .file_name("screenshot.png")
            .mime_str("image/png")?;
        let form = reqwest::multipart::Form::new()
            .part(SCREENSHOT_FIELD, part)
            .text(METADATA_FIELD, metadata_json);

        let response = self.http.post(self.endpoint()).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadFailure::Status { status, body });
        }

        let mut parsed: UploadResponse = response.json().await?;
        parsed.url = rewrite_loopback(&self.base_url, &parsed.url, &parsed.id.to_string());
        Ok(parsed)
    }
}

#[async_trait]
impl Uploader for UploadClient {
    async fn upload(&self, image: Bytes, metadata: &UploadMetadata) -> UploadOutcome {
        let size = image.len();
        match self.try_upload(image, metadata).await {
            Ok(response) => {
                tracing::info!(url = %response.url, id = %response.id, size, "Upload accepted");
                UploadOutcome {
                    success: response.success,
                    url: Some(response.url),
                    id: Some(response.id.to_string()),
                }
            }
            Err(error) => {
                tracing::warn!(%error, size, "Upload failed");
                UploadOutcome::default()
            }
        }
    }
}

/// A server left on its default configuration hands back loopback URLs;
/// rebuild those against the base URL the client was actually configured
/// with, preserving the `<base>/<id>` path convention.
fn rewrite_loopback(base_url: &str, url: &str, id: &str) -> String {
    let is_loopback = reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .is_some_and(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]" | "::1"));

    if is_loopback {
        format!("{}/{}", base_url, id)
    } else {
        url.to_string()
    }
}
