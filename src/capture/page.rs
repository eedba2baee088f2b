//! Page-context collaborator seam
//!
//! The capture pipeline needs three things from the page it is
//! photographing: hide the selection visualization, restore it, and
//! report the display's device pixel ratio. All three are best-effort
//! from the orchestrator's point of view.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabError {
    #[error("no active tab")]
    NoActiveTab,

    #[error("page script failed: {0}")]
    ScriptFailed(String),
}

/// Token returned by a successful hide; handing it back restores the
/// selection UI. Replaces an implicit "currently hidden overlay"
/// singleton with an explicit handle.
#[derive(Debug)]
pub struct HiddenUi {
    _private: (),
}

impl HiddenUi {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for HiddenUi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait PageContext: Send + Sync {
    /// Hide the selection visualization before the capture snapshot.
    async fn hide_selection_ui(&self) -> Result<HiddenUi, TabError>;

    /// Restore a previously hidden selection visualization.
    async fn restore_selection_ui(&self, token: HiddenUi) -> Result<(), TabError>;

    /// Device pixel ratio of the capturing display.
    async fn device_pixel_ratio(&self) -> Result<f64, TabError>;
}

/// Page context with a fixed pixel ratio and no selection UI to manage.
/// Used when the viewport raster comes from outside a live page, e.g.
/// the file-backed capture subcommand.
#[derive(Debug, Clone)]
pub struct StaticPage {
    dpr: f64,
}

impl StaticPage {
    pub fn new(dpr: f64) -> Self {
        Self { dpr }
    }
}

#[async_trait]
impl PageContext for StaticPage {
    async fn hide_selection_ui(&self) -> Result<HiddenUi, TabError> {
        Ok(HiddenUi::new())
    }

    async fn restore_selection_ui(&self, _token: HiddenUi) -> Result<(), TabError> {
        Ok(())
    }

    async fn device_pixel_ratio(&self) -> Result<f64, TabError> {
        Ok(self.dpr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_page_reports_its_ratio() {
        let page = StaticPage::new(2.0);
        assert_eq!(page.device_pixel_ratio().await.unwrap(), 2.0);

        let token = page.hide_selection_ui().await.unwrap();
        page.restore_selection_ui(token).await.unwrap();
    }
}
