//! Core types for image decoding.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for image ingestion.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes are not a recognizable image container.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The container was recognized but is not one the editor accepts.
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// The image decoded to zero width or height.
    #[error("Image has no pixels")]
    EmptyImage,

    /// Decoding would exceed the decoder's memory limits.
    #[error("Out of memory during decoding")]
    OutOfMemory,
}

/// Filter type for resampling with `image::imageops`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Options for [`super::decode_image`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DecodeOptions {
    /// Rotate/flip according to the EXIF orientation tag.
    pub apply_orientation: bool,
    /// Downscale so the longest edge is at most this many pixels.
    /// `None` or `Some(0)` keeps the decoded size.
    pub max_edge: Option<u32>,
    /// Filter used for the `max_edge` downscale.
    pub resize_filter: FilterType,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            apply_orientation: true,
            max_edge: None,
            resize_filter: FilterType::Lanczos3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_orientation_swaps_dimensions() {
        assert!(!Orientation::Normal.swaps_dimensions());
        assert!(!Orientation::Rotate180.swaps_dimensions());
        assert!(Orientation::Rotate90CW.swaps_dimensions());
        assert!(Orientation::Transverse.swaps_dimensions());
    }

    #[test]
    fn test_decode_options_defaults() {
        let opts = DecodeOptions::default();
        assert!(opts.apply_orientation);
        assert_eq!(opts.max_edge, None);
    }

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::UnsupportedFormat("Tiff".to_string());
        assert_eq!(err.to_string(), "Unsupported image format: Tiff");

        let err = DecodeError::InvalidFormat;
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
    }
}
