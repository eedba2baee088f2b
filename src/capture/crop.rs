//! Raster crop of a full-viewport capture to a selected region

use std::io::Cursor;

use bytes::Bytes;
use image::ImageFormat;
use image::imageops::FilterType;
use thiserror::Error;

use super::geometry::SelectionArea;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("failed to decode capture: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode cropped image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("selection {0}x{1} has no visible extent")]
    EmptySelection(u32, u32),

    #[error("selection lies outside the captured raster")]
    OutOfBounds,
}

pub type Result<T> = std::result::Result<T, CropError>;

/// Crop a PNG-encoded viewport capture down to the selected area.
///
/// The selection arrives in CSS pixels and is mapped onto the raster by
/// the device pixel ratio; the cropped region is resampled back to the
/// unscaled CSS-pixel size, so the output dimensions do not depend on
/// the ratio. The result is PNG-encoded.
pub fn crop(raw: &[u8], area: &SelectionArea, dpr: f64) -> Result<Bytes> {
    let (out_width, out_height) = area.output_dimensions();
    if out_width == 0 || out_height == 0 {
        return Err(CropError::EmptySelection(out_width, out_height));
    }

    let source = image::ImageReader::new(Cursor::new(raw))
        .with_guessed_format()
        .map_err(|e| CropError::Decode(image::ImageError::IoError(e)))?
        .decode()
        .map_err(CropError::Decode)?;

    let rect = area.to_device(dpr);
    if rect.left >= source.width() || rect.top >= source.height() {
        return Err(CropError::OutOfBounds);
    }

    // Clamp to the raster so a selection brushing the viewport edge still
    // produces a full-size output
    let width = rect.width.min(source.width() - rect.left);
    let height = rect.height.min(source.height() - rect.top);
    if width == 0 || height == 0 {
        return Err(CropError::OutOfBounds);
    }

    let cropped = source.crop_imm(rect.left, rect.top, width, height);
    let output = if cropped.width() == out_width && cropped.height() == out_height {
        cropped
    } else {
        cropped.resize_exact(out_width, out_height, FilterType::Triangle)
    };

    let mut buffer = Vec::new();
    output
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(CropError::Encode)?;

    tracing::debug!(
        out_width,
        out_height,
        device_left = rect.left,
        device_top = rect.top,
        device_width = width,
        device_height = height,
        "Cropped capture"
    );

    Ok(Bytes::from(buffer))
}
