//! Luminance helpers using ITU-R BT.709 coefficients.
//!
//! Saturation blends each channel toward this luminance, and the same weights
//! are used to summarise how bright a buffer is.

use crate::raster::{RasterBuffer, CHANNELS};

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Weighted luminance of an RGB triple. Scale-agnostic: 0-1 in gives 0-1
/// out, 0-255 in gives 0-255 out.
#[inline]
pub fn calculate_luminance(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Mean luminance (0-255) over all pixels, ignoring alpha.
///
/// Returns 0.0 for an empty buffer.
pub fn mean_luminance(image: &RasterBuffer) -> f32 {
    let count = image.pixel_count();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = image
        .pixels()
        .chunks_exact(CHANNELS)
        .map(|p| calculate_luminance(p[0] as f32, p[1] as f32, p[2] as f32) as f64)
        .sum();
    (sum / count as f64) as f32
}
