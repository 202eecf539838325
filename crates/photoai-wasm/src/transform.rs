//! WASM bindings for rotation and crop.
//!
//! Crop rectangles are percentages (0 to 100) of the image, matching the
//! crop tool's handles. Rotation is in degrees, positive = clockwise, the
//! same convention as CSS `rotate()`.

use crate::types::{interpolation, to_js_error, JsRasterBuffer};
use photoai_core::transform::{self, CropRect};
use wasm_bindgen::prelude::*;

/// Rotate an image around its center.
///
/// The output canvas is expanded to fit the rotated image; uncovered corners
/// are transparent. Multiples of 90° are exact.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const preview = apply_rotation(image, 15.0, false); // bilinear
/// const final = apply_rotation(image, 15.0, true);    // lanczos3
/// ```
#[wasm_bindgen]
pub fn apply_rotation(
    image: &JsRasterBuffer,
    angle_degrees: f64,
    use_lanczos: bool,
) -> Result<JsRasterBuffer, JsValue> {
    transform::rotate(image.as_core(), angle_degrees, interpolation(use_lanczos))
        .map(JsRasterBuffer::from_core)
        .map_err(to_js_error)
}

/// Crop a region given in percent of the image.
///
/// Out-of-range values are clamped rather than rejected.
///
/// ```typescript
/// // Center 50% of the image
/// const cropped = apply_crop(image, 25, 25, 50, 50);
/// ```
#[wasm_bindgen]
pub fn apply_crop(
    image: &JsRasterBuffer,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Result<JsRasterBuffer, JsValue> {
    transform::crop(image.as_core(), &CropRect::new(x, y, width, height))
        .map(JsRasterBuffer::from_core)
        .map_err(to_js_error)
}

/// Rotate, then crop against the rotated canvas.
#[wasm_bindgen]
pub fn apply_crop_rotated(
    image: &JsRasterBuffer,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    angle_degrees: f64,
    use_lanczos: bool,
) -> Result<JsRasterBuffer, JsValue> {
    transform::crop_rotated(
        image.as_core(),
        &CropRect::new(x, y, width, height),
        angle_degrees,
        interpolation(use_lanczos),
    )
    .map(JsRasterBuffer::from_core)
    .map_err(to_js_error)
}

/// Canvas size after rotating a `width x height` image.
#[wasm_bindgen]
pub fn rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> Vec<u32> {
    let (w, h) = transform::compute_rotated_bounds(width, height, angle_degrees);
    vec![w, h]
}
