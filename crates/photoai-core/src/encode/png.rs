//! Lossless PNG export, alpha preserved.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::raster::RasterBuffer;

/// Encode a buffer as an RGBA PNG.
pub fn encode_png(image: &RasterBuffer) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if image.is_empty() {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
