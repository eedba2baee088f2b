//! Capture orchestration
//!
//! Sequences one capture pipeline per request: hide the selection UI,
//! settle, capture the viewport, restore the UI, crop, upload. Stage
//! failures surface as typed errors; a crop failure degrades to
//! uploading the uncropped capture, reported distinctly.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;

use super::capturer::{CaptureError, ViewportCapturer};
use super::crop;
use super::geometry::SelectionArea;
use super::message::Envelope;
use super::page::PageContext;
use crate::client::Uploader;
use crate::storage::UploadMetadata;

/// How long to let the selection-UI hide paint before the snapshot
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("a capture is already in flight")]
    Busy,

    #[error("selection has no visible extent")]
    EmptySelection,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("upload failed")]
    Upload,
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub url: String,
    pub id: Option<String>,
    /// True when cropping failed and the uncropped capture was uploaded
    pub full_frame: bool,
}

pub struct Orchestrator {
    capturer: Arc<dyn ViewportCapturer>,
    page: Arc<dyn PageContext>,
    uploader: Arc<dyn Uploader>,
    source: String,
    settle_delay: Duration,
    gate: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        capturer: Arc<dyn ViewportCapturer>,
        page: Arc<dyn PageContext>,
        uploader: Arc<dyn Uploader>,
        source: &str,
    ) -> Self {
        Self {
            capturer,
            page,
            uploader,
            source: source.to_string(),
            settle_delay: DEFAULT_SETTLE_DELAY,
            gate: Mutex::new(()),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Message-boundary adapter: a capture request in, a capture result
    /// out. Never panics and never leaks an error past the envelope.
    pub async fn handle(&self, envelope: Envelope) -> Envelope {
        match envelope {
            Envelope::CaptureRequest { area } => match self.run(&area).await {
                Ok(outcome) => {
                    if outcome.full_frame {
                        tracing::warn!(url = %outcome.url, "Uploaded full-frame fallback");
                    }
                    Envelope::success(outcome.url)
                }
                Err(error) => {
                    tracing::error!(%error, "Capture pipeline failed");
                    Envelope::failure(error.to_string())
                }
            },
            Envelope::CaptureResult { .. } => Envelope::failure("unexpected message kind"),
        }
    }

    /// Run one capture pipeline. A second call while one is in flight is
    /// rejected rather than queued; a queued capture would snapshot
    /// stale UI state.
    pub async fn run(&self, area: &SelectionArea) -> Result<CaptureOutcome> {
        let _guard = self.gate.try_lock().map_err(|_| PipelineError::Busy)?;

        if area.is_empty() {
            return Err(PipelineError::EmptySelection);
        }

        // Hide the selection UI so it does not bleed into the snapshot;
        // failing to hide is non-fatal.
        let hidden = match self.page.hide_selection_ui().await {
            Ok(token) => Some(token),
            Err(error) => {
                tracing::warn!(%error, "Could not hide selection UI before capture");
                None
            }
        };

        // The hide is asynchronous but not guaranteed to have painted.
        tokio::time::sleep(self.settle_delay).await;

        let captured = self.capturer.capture_visible().await;

        // Restore the UI whether or not the capture succeeded
        if let Some(token) = hidden {
            if let Err(error) = self.page.restore_selection_ui(token).await {
                tracing::warn!(%error, "Could not restore selection UI after capture");
            }
        }

        let raw = captured?;
        tracing::debug!(size = raw.len(), "Captured visible viewport");

        let dpr = match self.page.device_pixel_ratio().await {
            Ok(dpr) => dpr,
            Err(error) => {
                tracing::warn!(%error, "Could not query device pixel ratio, assuming 1");
                1.0
            }
        };

        let (image, full_frame) = match crop::crop(&raw, area, dpr) {
            Ok(cropped) => (cropped, false),
            Err(error) => {
                tracing::warn!(%error, "Crop failed, uploading uncropped capture");
                (raw, true)
            }
        };

        let metadata = UploadMetadata {
            timestamp: Some(Utc::now().timestamp_millis()),
            source: Some(self.source.clone()),
            ..Default::default()
        };

        let outcome = self.uploader.upload(image, &metadata).await;
        if !outcome.success {
            return Err(PipelineError::Upload);
        }
        let url = outcome.url.ok_or(PipelineError::Upload)?;

        tracing::info!(%url, full_frame, "Capture pipeline complete");
        Ok(CaptureOutcome {
            url,
            id: outcome.id,
            full_frame,
        })
    }
}
