//! Color adjustment bindings.
//!
//! Exposes the three slider values to TypeScript. Each slider is an integer
//! percentage in `[0, 200]` with 100 as "unchanged"; setters clamp.

use crate::types::{to_js_error, JsRasterBuffer};
use photoai_core::adjustments as core;
use wasm_bindgen::prelude::*;

/// Brightness / contrast / saturation wrapper for JavaScript
#[wasm_bindgen]
pub struct Adjustments {
    inner: photoai_core::Adjustments,
}

#[wasm_bindgen]
impl Adjustments {
    /// Create adjustments at identity (100, 100, 100)
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: photoai_core::Adjustments::IDENTITY,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn brightness(&self) -> u8 {
        self.inner.brightness
    }

    #[wasm_bindgen(setter)]
    pub fn set_brightness(&mut self, value: i32) {
        self.inner = self
            .inner
            .with(photoai_core::AdjustmentKind::Brightness, value);
    }

    #[wasm_bindgen(getter)]
    pub fn contrast(&self) -> u8 {
        self.inner.contrast
    }

    #[wasm_bindgen(setter)]
    pub fn set_contrast(&mut self, value: i32) {
        self.inner = self
            .inner
            .with(photoai_core::AdjustmentKind::Contrast, value);
    }

    #[wasm_bindgen(getter)]
    pub fn saturation(&self) -> u8 {
        self.inner.saturation
    }

    #[wasm_bindgen(setter)]
    pub fn set_saturation(&mut self, value: i32) {
        self.inner = self
            .inner
            .with(photoai_core::AdjustmentKind::Saturation, value);
    }

    /// Check if all sliders are at 100
    pub fn is_identity(&self) -> bool {
        self.inner.is_identity()
    }

    /// Serialize to a plain JS object
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(to_js_error)
    }

    /// Deserialize from a plain JS object; missing keys default to 100
    pub fn from_json(value: JsValue) -> Result<Adjustments, JsValue> {
        let inner: photoai_core::Adjustments =
            serde_wasm_bindgen::from_value(value).map_err(to_js_error)?;
        Ok(Self { inner })
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::new()
    }
}

impl Adjustments {
    pub(crate) fn inner(&self) -> &photoai_core::Adjustments {
        &self.inner
    }
}

/// Apply adjustments to an image, returning a new image.
///
/// # Example (TypeScript)
/// ```typescript
/// const adj = new Adjustments();
/// adj.brightness = 130;
/// const adjusted = apply_adjustments(sourceImage, adj);
/// ```
#[wasm_bindgen]
pub fn apply_adjustments(
    image: &JsRasterBuffer,
    adjustments: &Adjustments,
) -> Result<JsRasterBuffer, JsValue> {
    core::apply_adjustments(image.as_core(), adjustments.inner())
        .map(JsRasterBuffer::from_core)
        .map_err(to_js_error)
}
