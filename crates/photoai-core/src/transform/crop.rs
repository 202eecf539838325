//! Image cropping with percentage rectangles.
//!
//! A [`CropRect`] is expressed in percent of the source dimensions, so the
//! same rectangle means the same region at any resolution.
//!
//! # Coordinate System
//!
//! - (0, 0) = top-left corner
//! - (100, 100) = bottom-right corner
//! - `x + width` and `y + height` are clamped to 100, never rejected

use serde::{Deserialize, Serialize};

use super::rotation::{rotate, InterpolationFilter};
use crate::error::EditError;
use crate::raster::{RasterBuffer, CHANNELS};

/// Crop region in percent of the source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    /// Left edge (0 to 100)
    pub x: f64,
    /// Top edge (0 to 100)
    pub y: f64,
    /// Width (0 to 100 - x)
    pub width: f64,
    /// Height (0 to 100 - y)
    pub height: f64,
}

impl CropRect {
    /// The whole image.
    pub const FULL: CropRect = CropRect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The effective rectangle: every value in `[0, 100]` with
    /// `x + width <= 100` and `y + height <= 100`.
    ///
    /// Non-finite values fall back to the full extent.
    pub fn clamped(&self) -> Self {
        let x = finite_or(self.x, 0.0).clamp(0.0, 100.0);
        let y = finite_or(self.y, 0.0).clamp(0.0, 100.0);
        let width = finite_or(self.width, 100.0).clamp(0.0, 100.0 - x);
        let height = finite_or(self.height, 100.0).clamp(0.0, 100.0 - y);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Map to an absolute pixel rectangle inside a `width x height` image.
    ///
    /// Each edge is `round(value / 100 * dimension)`, clamped to the image
    /// bounds, with a minimum size of 1x1.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        let rect = self.clamped();
        let (left, out_width) = span(rect.x, rect.width, width);
        let (top, out_height) = span(rect.y, rect.height, height);
        PixelRect {
            left,
            top,
            width: out_width,
            height: out_height,
        }
    }

    /// True when the rectangle selects the whole image.
    pub fn is_full(&self) -> bool {
        self.clamped() == Self::FULL
    }
}

impl Default for CropRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Absolute crop region in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[inline]
fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Convert one axis of a percentage span to (start, length) in pixels.
fn span(start_pct: f64, len_pct: f64, dimension: u32) -> (u32, u32) {
    let dim = dimension as f64;
    let start = ((start_pct / 100.0 * dim).round() as u32).min(dimension.saturating_sub(1));
    let len = (len_pct / 100.0 * dim).round() as u32;
    let end = start.saturating_add(len).min(dimension);
    (start, end.saturating_sub(start).max(1))
}

/// Crop an image to a percentage rectangle.
///
/// # Behavior
///
/// - Out-of-range rectangles are clamped, not rejected
/// - Output is never larger than the source and never smaller than 1x1
/// - A full rectangle returns the source pixels unchanged
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if `source` has zero area.
pub fn crop(source: &RasterBuffer, rect: &CropRect) -> Result<RasterBuffer, EditError> {
    source.ensure_non_empty("crop")?;

    // Fast path: full crop returns a clone
    if rect.is_full() {
        return Ok(source.clone());
    }

    let region = rect.to_pixels(source.width(), source.height());
    let src_stride = source.width() as usize * CHANNELS;
    let row_bytes = region.width as usize * CHANNELS;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy pixel data row by row
    for y in region.top..region.top + region.height {
        let start = y as usize * src_stride + region.left as usize * CHANNELS;
        output.extend_from_slice(&source.pixels()[start..start + row_bytes]);
    }

    Ok(RasterBuffer::from_raw(region.width, region.height, output))
}

/// Rotate first, then clip `rect` against the rotated canvas.
///
/// This is the crop tool's combined apply: the rectangle is read against
/// the image as it looks after rotation, so rotation and clip compose as a
/// single affine transform followed by a single clip.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if `source` has zero area.
pub fn crop_rotated(
    source: &RasterBuffer,
    rect: &CropRect,
    degrees: f64,
    filter: InterpolationFilter,
) -> Result<RasterBuffer, EditError> {
    let rotated = rotate(source, degrees, filter)?;
    crop(&rotated, rect)
}
