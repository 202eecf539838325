//! PhotoAI WASM - WebAssembly bindings for the PhotoAI editor
//!
//! Exposes photoai-core to the browser shell.
//!
//! # Module Structure
//!
//! - `session` - `JsEditSession`, the stateful editor for one image
//! - `adjustments` - Brightness, contrast and saturation
//! - `transform` - Rotation and crop
//! - `background` - Gradient/image compositing and the preset catalogue
//! - `decode` - Image ingestion
//! - `encode` - PNG and JPEG export
//! - `types` - WASM-compatible wrapper types for image data
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession } from '@photoai/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const session = new JsEditSession(bytes);
//! const current = session.setAdjustment('brightness', 120);
//! console.log(`Current ${current.width}x${current.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod adjustments;
mod background;
mod decode;
mod encode;
mod session;
mod transform;
mod types;

pub use adjustments::{apply_adjustments, Adjustments};
pub use background::{
    composite_gradient, composite_image, gradient_presets, image_presets, render_gradient,
};
pub use decode::{decode_image, is_supported_image, resize, resize_to_fit};
pub use encode::{encode_image, encode_jpeg, encode_png};
pub use session::JsEditSession;
pub use transform::{apply_crop, apply_crop_rotated, apply_rotation, rotated_bounds};
pub use types::JsRasterBuffer;

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
