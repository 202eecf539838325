//! JPEG export.
//!
//! JPEG has no alpha channel, so transparent pixels are flattened onto
//! white before encoding.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;
use crate::raster::{RasterBuffer, CHANNELS};

/// Encode a buffer as JPEG.
///
/// `quality` is clamped to `1..=100`.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for further editing
/// * 80-90: Good quality, recommended for most uses
/// * 60-80: Medium quality, acceptable for web/social media
pub fn encode_jpeg(image: &RasterBuffer, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if image.is_empty() {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let rgb = flatten_on_white(image);
    let quality = quality.clamp(1, 100);

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite straight-alpha RGBA over opaque white, dropping alpha.
fn flatten_on_white(image: &RasterBuffer) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(image.pixel_count() * 3);
    for px in image.pixels().chunks_exact(CHANNELS) {
        let a = px[3] as u32;
        for &c in &px[..3] {
            // (c * a + 255 * (255 - a)) / 255, rounded
            let v = (c as u32 * a + 255 * (255 - a) + 127) / 255;
            rgb.push(v as u8);
        }
    }
    rgb
}
