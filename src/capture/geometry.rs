//! Selection geometry and the CSS-pixel to device-pixel transform

use serde::{Deserialize, Serialize};

/// A rectangular selection in CSS-pixel (viewport) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A sub-rectangle of the raster capture, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl SelectionArea {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A selection with no visible extent; rejected before capture
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Map the selection onto the device-pixel raster.
    ///
    /// Each field is scaled and rounded independently, so `left + width`
    /// can drift up to 1px from `round((x + width) * dpr)` at fractional
    /// ratios. Callers relying on exact right/bottom edges must not
    /// pre-sum the fields.
    pub fn to_device(&self, dpr: f64) -> DeviceRect {
        let dpr = effective_dpr(dpr);
        let scale = |v: f64| (v.max(0.0) * dpr).round() as u32;
        DeviceRect {
            left: scale(self.x),
            top: scale(self.y),
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    /// Crop output size in CSS pixels, independent of the ratio
    pub fn output_dimensions(&self) -> (u32, u32) {
        (
            self.width.max(0.0).round() as u32,
            self.height.max(0.0).round() as u32,
        )
    }
}

/// Device pixel ratios are positive floats; anything else falls back to 1
pub fn effective_dpr(dpr: f64) -> f64 {
    if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 }
}
