//! Export encoding.
//!
//! PNG is the default export: lossless, with the alpha channel intact so a
//! cut-out foreground stays transparent. JPEG is offered for smaller files
//! and flattens transparency onto white.

mod jpeg;
mod png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::raster::RasterBuffer;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

/// Default JPEG quality for exports.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while encoding an export.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Output container for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg {
        #[serde(default = "default_quality")]
        quality: u8,
    },
}

fn default_quality() -> u8 {
    DEFAULT_JPEG_QUALITY
}

impl ExportFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg { .. } => "image/jpeg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg { .. } => "jpg",
        }
    }
}

/// Encode `image` in the requested format.
pub fn encode(image: &RasterBuffer, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    match format {
        ExportFormat::Png => encode_png(image),
        ExportFormat::Jpeg { quality } => encode_jpeg(image, quality),
    }
}
