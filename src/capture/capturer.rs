//! Viewport capture collaborator seam

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture source unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
}

/// Produces a PNG-encoded raster of the visible viewport.
///
/// The privileged in-browser capture API sits behind this trait; the
/// shipped implementation reads the raster from a file instead.
#[async_trait]
pub trait ViewportCapturer: Send + Sync {
    async fn capture_visible(&self) -> Result<Bytes, CaptureError>;
}

/// Capturer backed by a PNG file produced by an external screenshotter
#[derive(Debug, Clone)]
pub struct FileCapturer {
    path: PathBuf,
}

impl FileCapturer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ViewportCapturer for FileCapturer {
    async fn capture_visible(&self) -> Result<Bytes, CaptureError> {
        let data = tokio::fs::read(&self.path).await?;
        tracing::debug!(
            path = %self.path.display(),
            size = data.len(),
            "Read capture source"
        );
        Ok(Bytes::from(data))
    }
}
