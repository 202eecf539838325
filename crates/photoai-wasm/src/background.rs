//! Background compositing and preset bindings.
//!
//! These are the stateless helpers behind the background picker. Inside an
//! edit session use `JsEditSession.addGradientBackground` and friends
//! instead, which also enforce that background removal happened first.

use crate::types::{filter_from_u8, to_js_error, JsRasterBuffer};
use photoai_core::composite::{self, BackgroundSpec, GRADIENT_ANGLE_DEGREES};
use photoai_core::palette::{GRADIENT_PRESETS, IMAGE_PRESETS};
use photoai_core::GradientStops;
use wasm_bindgen::prelude::*;

/// Draw `foreground` over a 135° gradient between two hex colors.
///
/// ```typescript
/// const result = composite_gradient(cutout, '#ff6b6b', '#feca57');
/// ```
#[wasm_bindgen]
pub fn composite_gradient(
    foreground: &JsRasterBuffer,
    start: &str,
    end: &str,
) -> Result<JsRasterBuffer, JsValue> {
    let stops = GradientStops::from_hex(start, end).map_err(to_js_error)?;
    composite::composite(
        foreground.as_core(),
        &BackgroundSpec::Gradient(stops),
        Default::default(),
    )
    .map(JsRasterBuffer::from_core)
    .map_err(to_js_error)
}

/// Draw `foreground` over `background`, cover-fitted and centered.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn composite_image(
    foreground: &JsRasterBuffer,
    background: &JsRasterBuffer,
    filter: u8,
) -> Result<JsRasterBuffer, JsValue> {
    composite::composite(
        foreground.as_core(),
        &BackgroundSpec::Image(background.as_core().clone()),
        filter_from_u8(filter),
    )
    .map(JsRasterBuffer::from_core)
    .map_err(to_js_error)
}

/// Paint a gradient swatch, e.g. for picker thumbnails.
#[wasm_bindgen]
pub fn render_gradient(
    width: u32,
    height: u32,
    start: &str,
    end: &str,
) -> Result<JsRasterBuffer, JsValue> {
    let stops = GradientStops::from_hex(start, end).map_err(to_js_error)?;
    Ok(JsRasterBuffer::from_core(composite::fill_gradient(
        width,
        height,
        &stops,
        GRADIENT_ANGLE_DEGREES,
    )))
}

/// Built-in gradient presets as `[{ name, stops: { start, end } }]`.
#[wasm_bindgen]
pub fn gradient_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&GRADIENT_PRESETS).map_err(to_js_error)
}

/// Built-in image backgrounds as `[{ name, url, thumbnail }]`.
#[wasm_bindgen]
pub fn image_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&IMAGE_PRESETS).map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use photoai_core::RasterBuffer;

    #[test]
    fn test_composite_gradient_fills_transparency() {
        let fg = JsRasterBuffer::from_core(RasterBuffer::filled(8, 8, [0, 0, 0, 0]));
        let result = composite_gradient(&fg, "#000000", "#000000").unwrap();
        assert!(result.as_core().is_opaque());
    }

    #[test]
    fn test_composite_image_keeps_foreground_size() {
        let fg = JsRasterBuffer::from_core(RasterBuffer::filled(12, 6, [0, 0, 0, 0]));
        let bg = JsRasterBuffer::from_core(RasterBuffer::filled(5, 5, [1, 2, 3, 255]));
        let result = composite_image(&fg, &bg, 1).unwrap();
        assert_eq!((result.width(), result.height()), (12, 6));
        assert_eq!(&result.pixels()[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_render_gradient_size() {
        let swatch = render_gradient(20, 12, "#667eea", "#764ba2").unwrap();
        assert_eq!((swatch.width(), swatch.height()), (20, 12));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use photoai_core::RasterBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_bad_color_is_an_error() {
        let fg = JsRasterBuffer::from_core(RasterBuffer::filled(2, 2, [0; 4]));
        assert!(composite_gradient(&fg, "red", "#fff").is_err());
    }

    #[wasm_bindgen_test]
    fn test_presets_serialize_to_arrays() {
        let presets = gradient_presets().unwrap();
        assert!(js_sys::Array::is_array(&presets));
        assert_eq!(js_sys::Array::from(&presets).length(), 8);
    }
}
