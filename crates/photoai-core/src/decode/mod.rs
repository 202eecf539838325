//! Image ingestion for the editor.
//!
//! This module provides:
//! - Decoding PNG, JPEG, GIF, BMP and WebP bytes into RGBA
//! - EXIF orientation correction
//! - Optional downscaling of oversized uploads
//!
//! Decoding is synchronous. A failed decode never produces a buffer, so an
//! edit session is never created from a bad input.

mod reader;
mod resize;
mod types;

pub use reader::{decode_image, detect_format, SUPPORTED_FORMATS};
pub use resize::{resize, resize_to_fit};
pub use types::{DecodeError, DecodeOptions, FilterType, Orientation};
