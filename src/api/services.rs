use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;

use super::{
    error::ApiError,
    models::{HealthResponse, METADATA_FIELD, SCREENSHOT_FIELD, UploadResponse},
    state::AppState,
    utils,
};

/// Screenshot upload endpoint (POST /upload)
///
/// Accepts `multipart/form-data` with the PNG under the `screenshot`
/// field and an optional JSON metadata string under `metadata`.
///
/// ## Flow:
/// 1. Walk the multipart fields; unknown fields are ignored
/// 2. Reject a missing screenshot field (400 MISSING_FILE)
/// 3. Fast size/MIME checks before touching storage (400)
/// 4. Parse metadata defensively; bad metadata never fails an upload
/// 5. Persist via the screenshot store (validates again, stamps expiry)
/// 6. Return 201 with the share URL, id, and expiry
pub async fn upload_screenshot(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut screenshot: Option<(bytes::Bytes, Option<String>)> = None;
    let mut metadata_raw: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            SCREENSHOT_FIELD => {
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Upload(e.to_string()))?;
                screenshot = Some((data, content_type));
            }
            METADATA_FIELD => {
                // Unreadable metadata degrades like unparseable metadata
                metadata_raw = field.text().await.ok();
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    let Some((data, content_type)) = screenshot else {
        state.metrics.upload_rejected();
        return Err(ApiError::MissingFile);
    };

    tracing::info!(
        size = data.len(),
        content_type = content_type.as_deref().unwrap_or("<none>"),
        has_metadata = metadata_raw.is_some(),
        "Received upload request"
    );

    if let Err(error) = utils::check_size(data.len() as u64, state.store.max_file_size())
        .and_then(|()| utils::check_content_type(content_type.as_deref()))
    {
        state.metrics.upload_rejected();
        return Err(error);
    }

    let metadata = utils::parse_metadata(metadata_raw.as_deref(), &state.config.retention);

    let saved = match state
        .store
        .save(data, content_type.as_deref(), metadata)
        .await
    {
        Ok(saved) => saved,
        Err(error) => {
            state.metrics.upload_rejected();
            return Err(error.into());
        }
    };

    state.metrics.upload_accepted();

    let response = UploadResponse {
        success: true,
        url: saved.url,
        id: saved.id,
        expires_at: saved.expires_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Screenshot retrieval endpoint (GET /{id} and GET /upload/{id})
///
/// Streams the stored bytes with their stored content type. The store
/// collapses backend failures to not-found, so the only error paths
/// here are a blank id and a miss.
pub async fn fetch_screenshot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::MissingId);
    }

    let Some(stored) = state.store.get(id).await else {
        return Err(ApiError::NotFound);
    };

    state.metrics.screenshot_served();
    tracing::debug!(id, size = stored.data.len(), "Serving screenshot");

    Ok(([(header::CONTENT_TYPE, stored.content_type)], stored.data))
}

/// Health check endpoint (GET /health)
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
