//! WASM-compatible wrapper types for image data.
//!
//! Handles the conversion between core types and their JavaScript
//! representations.

use std::fmt::Display;

use photoai_core::decode::FilterType;
use photoai_core::{InterpolationFilter, RasterBuffer};
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// # Memory Management
///
/// The pixel data stays in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`; keep images in WASM and only extract pixels for display.
/// Clones inside WASM share the same storage.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsRasterBuffer {
    inner: RasterBuffer,
}

#[wasm_bindgen]
impl JsRasterBuffer {
    /// Wrap RGBA pixel data (4 bytes per pixel, row-major order), for
    /// example `ImageData.data` from a canvas.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsRasterBuffer, JsValue> {
        RasterBuffer::new(width, height, pixels)
            .map(Self::from_core)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels().len()
    }

    /// Returns RGBA pixel data as a Uint8Array copy.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels().to_vec()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {}
}

impl JsRasterBuffer {
    pub(crate) fn from_core(inner: RasterBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn as_core(&self) -> &RasterBuffer {
        &self.inner
    }
}

/// Convert a u8 filter value to the core `FilterType`.
///
/// 0 = Nearest, 1 = Bilinear, 2 = Lanczos3. Anything else is Bilinear.
pub(crate) fn filter_from_u8(value: u8) -> FilterType {
    match value {
        0 => FilterType::Nearest,
        2 => FilterType::Lanczos3,
        _ => FilterType::Bilinear,
    }
}

pub(crate) fn interpolation(use_lanczos: bool) -> InterpolationFilter {
    if use_lanczos {
        InterpolationFilter::Lanczos3
    } else {
        InterpolationFilter::Bilinear
    }
}

/// Error values cross the boundary as plain strings.
pub(crate) fn to_js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Deserialize an optional JS object, treating `undefined`/`null` as default.
pub(crate) fn from_js_or_default<T>(value: JsValue) -> Result<T, JsValue>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_constructor_rejects_wrong_length() {
        assert!(JsRasterBuffer::new(2, 2, vec![0; 15]).is_err());
        assert!(JsRasterBuffer::new(2, 2, vec![0; 16]).is_ok());
    }
}
