//! Image decoding WASM bindings.
//!
//! # Functions
//!
//! - [`decode_image`] - Decode PNG, JPEG, GIF, BMP or WebP bytes to RGBA
//! - [`is_supported_image`] - Check whether bytes are an accepted format
//! - [`resize`] - Resize an image to exact dimensions
//! - [`resize_to_fit`] - Shrink an image to fit within a max edge
//!
//! # Example
//!
//! ```typescript
//! import { decode_image } from '@photoai/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes, { maxEdge: 4096 });
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::{filter_from_u8, from_js_or_default, to_js_error, JsRasterBuffer};
use photoai_core::decode::{self, DecodeOptions};
use wasm_bindgen::prelude::*;

/// Decode an uploaded image.
///
/// `options` is an optional object with `applyOrientation`, `maxEdge` and
/// `resizeFilter` keys; see `DecodeOptions`. EXIF orientation is applied by
/// default.
///
/// # Errors
///
/// Returns an error string if the bytes are not a supported image or the
/// file is corrupted.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], options: JsValue) -> Result<JsRasterBuffer, JsValue> {
    let options: DecodeOptions = from_js_or_default(options)?;
    decode::decode_image(bytes, &options)
        .map(JsRasterBuffer::from_core)
        .map_err(to_js_error)
}

/// True if the bytes start like a PNG, JPEG, GIF, BMP or WebP file.
#[wasm_bindgen]
pub fn is_supported_image(bytes: &[u8]) -> bool {
    decode::detect_format(bytes).is_ok()
}

/// Resize an image to exact dimensions.
///
/// `filter`: 0 = Nearest, 1 = Bilinear, 2 = Lanczos3.
#[wasm_bindgen]
pub fn resize(
    image: &JsRasterBuffer,
    width: u32,
    height: u32,
    filter: u8,
) -> Result<JsRasterBuffer, JsValue> {
    decode::resize(image.as_core(), width, height, filter_from_u8(filter))
        .map(JsRasterBuffer::from_core)
        .map_err(to_js_error)
}

/// Shrink an image so its longest edge is at most `max_edge`.
///
/// Smaller images are returned unchanged.
#[wasm_bindgen]
pub fn resize_to_fit(image: &JsRasterBuffer, max_edge: u32, filter: u8) -> JsRasterBuffer {
    JsRasterBuffer::from_core(decode::resize_to_fit(
        image.as_core(),
        max_edge,
        filter_from_u8(filter),
    ))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use photoai_core::encode::encode_png;
    use photoai_core::RasterBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_png_with_default_options() {
        let png = encode_png(&RasterBuffer::filled(6, 3, [9, 8, 7, 255])).unwrap();
        let image = decode_image(&png, JsValue::UNDEFINED).unwrap();
        assert_eq!((image.width(), image.height()), (6, 3));
    }

    #[wasm_bindgen_test]
    fn test_decode_garbage_fails() {
        let err = decode_image(&[1, 2, 3], JsValue::NULL).err().unwrap();
        assert_eq!(
            err.as_string().unwrap(),
            "Invalid or unsupported image format"
        );
    }
}
