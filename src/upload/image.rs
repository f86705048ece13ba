//! Image extractor: JPEG/PNG bytes to an RGB pixel buffer.

use crate::types::{AppError, AppResult};
use ::image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use tracing::debug;

/// Decode image bytes and normalize to 8-bit RGB
pub fn extract(bytes: &[u8]) -> AppResult<RgbImage> {
    let img = ::image::load_from_memory(bytes)
        .map_err(|e| AppError::Decode(format!("Failed to load image: {e}")))?;

    debug!(
        width = img.width(),
        height = img.height(),
        color = ?img.color(),
        "Decoded image"
    );

    Ok(img.to_rgb8())
}

/// Encode pixels as JPEG for inline transport
pub fn encode_jpeg(pixels: &RgbImage) -> AppResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(pixels.clone())
        .write_to(&mut cursor, ImageFormat::Jpeg)
        .map_err(|e| AppError::Decode(format!("Failed to encode image as JPEG: {e}")))?;
    Ok(cursor.into_inner())
}
