//! Export encoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { encode_png, encode_jpeg } from '@photoai/wasm';
//!
//! const png = encode_png(image);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use crate::types::{from_js_or_default, to_js_error, JsRasterBuffer};
use photoai_core::encode::{self, ExportFormat};
use wasm_bindgen::prelude::*;

/// Encode an image as lossless RGBA PNG.
#[wasm_bindgen]
pub fn encode_png(image: &JsRasterBuffer) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.as_core()).map_err(to_js_error)
}

/// Encode an image as JPEG, flattening transparency onto white.
///
/// `quality` is 1-100 (recommended: 90).
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsRasterBuffer, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.as_core(), quality).map_err(to_js_error)
}

/// Encode with a format object: `{ format: "png" }` or
/// `{ format: "jpeg", quality: 90 }`. `undefined` means PNG.
#[wasm_bindgen]
pub fn encode_image(image: &JsRasterBuffer, format: JsValue) -> Result<Vec<u8>, JsValue> {
    let format: ExportFormat = from_js_or_default(format)?;
    encode::encode(image.as_core(), format).map_err(to_js_error)
}

/// Tests for encode bindings.
///
/// Functions returning `Result<T, JsValue>` only work on wasm32 targets for
/// their error paths; see `photoai_core::encode` for the full coverage.
#[cfg(test)]
mod tests {
    use super::*;
    use photoai_core::RasterBuffer;

    #[test]
    fn test_encode_png_signature() {
        let img = JsRasterBuffer::from_core(RasterBuffer::filled(10, 10, [1, 2, 3, 128]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_encode_jpeg_magic_bytes() {
        let img = JsRasterBuffer::from_core(RasterBuffer::filled(10, 10, [128, 128, 128, 255]));
        let jpeg = encode_jpeg(&img, 90).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use photoai_core::RasterBuffer;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_encode_image_defaults_to_png() {
        let img = JsRasterBuffer::from_core(RasterBuffer::filled(4, 4, [0; 4]));
        let bytes = encode_image(&img, JsValue::UNDEFINED).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[wasm_bindgen_test]
    fn test_encode_image_jpeg_object() {
        let img = JsRasterBuffer::from_core(RasterBuffer::filled(4, 4, [9, 9, 9, 255]));
        let format = serde_wasm_bindgen::to_value(&ExportFormat::Jpeg { quality: 70 }).unwrap();
        let bytes = encode_image(&img, format).unwrap();
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    }

    #[wasm_bindgen_test]
    fn test_encode_zero_area_fails() {
        let img = JsRasterBuffer::from_core(RasterBuffer::new(0, 0, vec![]).unwrap());
        assert!(encode_png(&img).is_err());
    }
}
