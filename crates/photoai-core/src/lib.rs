//! PhotoAI Core - image transform pipeline for the PhotoAI editor
//!
//! This crate takes an immutable source image plus a sequence of edit
//! operations and deterministically produces an output raster: color
//! adjustment, crop, rotation, and background replacement on top of an
//! externally produced background-removal result.
//!
//! The [`EditSession`] state machine owns the buffers and enforces the
//! ordering rules between operations; the stage modules are pure functions
//! over [`RasterBuffer`]s.

pub mod adjustments;
pub mod color;
pub mod composite;
pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod luminance;
pub mod palette;
pub mod raster;
pub mod remover;
pub mod session;
pub mod transform;

use std::str::FromStr;

pub use adjustments::apply_adjustments;
pub use color::{Color, GradientStops};
pub use composite::{composite, BackgroundSpec};
pub use config::EditorConfig;
pub use decode::{decode_image, DecodeError, DecodeOptions};
pub use encode::{encode, EncodeError, ExportFormat};
pub use error::EditError;
pub use raster::RasterBuffer;
pub use remover::{BackgroundRemover, ServiceError};
pub use session::{EditSession, RemovalOutcome, RemovalTicket};
pub use transform::{crop, crop_rotated, rotate, CropRect, GeometryOp, InterpolationFilter};

/// Slider-style color adjustments, each in `[0, 200]` with 100 as identity.
///
/// Deserializing clamps like [`Adjustments::new`], so `{ brightness: 300 }`
/// from JS becomes 200 instead of an error. Missing fields are 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawAdjustments")]
pub struct Adjustments {
    /// Brightness percentage (0 = black, 100 = unchanged, 200 = double)
    pub brightness: u8,
    /// Contrast percentage (0 = flat gray, 100 = unchanged)
    pub contrast: u8,
    /// Saturation percentage (0 = grayscale, 100 = unchanged)
    pub saturation: u8,
}

impl Adjustments {
    /// Lowest accepted slider value.
    pub const MIN: i32 = 0;
    /// Highest accepted slider value.
    pub const MAX: i32 = 200;
    /// The no-op setting.
    pub const IDENTITY: Adjustments = Adjustments {
        brightness: 100,
        contrast: 100,
        saturation: 100,
    };

    /// Create adjustments, clamping each value to `[0, 200]`.
    pub fn new(brightness: i32, contrast: i32, saturation: i32) -> Self {
        Self {
            brightness: clamp_value(brightness),
            contrast: clamp_value(contrast),
            saturation: clamp_value(saturation),
        }
    }

    /// Get one slider value.
    pub fn get(&self, kind: AdjustmentKind) -> u8 {
        match kind {
            AdjustmentKind::Brightness => self.brightness,
            AdjustmentKind::Contrast => self.contrast,
            AdjustmentKind::Saturation => self.saturation,
        }
    }

    /// Copy with one slider replaced (clamped).
    pub fn with(mut self, kind: AdjustmentKind, value: i32) -> Self {
        let value = clamp_value(value);
        match kind {
            AdjustmentKind::Brightness => self.brightness = value,
            AdjustmentKind::Contrast => self.contrast = value,
            AdjustmentKind::Saturation => self.saturation = value,
        }
        self
    }

    /// Re-clamp fields that may have been set directly or deserialized.
    pub fn clamped(self) -> Self {
        Self::new(
            self.brightness as i32,
            self.contrast as i32,
            self.saturation as i32,
        )
    }

    /// Check if all values are at identity
    pub fn is_identity(&self) -> bool {
        self.clamped() == Self::IDENTITY
    }
}

impl Default for Adjustments {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn clamp_value(value: i32) -> u8 {
    value.clamp(Adjustments::MIN, Adjustments::MAX) as u8
}

/// Wire form of [`Adjustments`]; JS numbers may be out of range or fractional.
#[derive(serde::Deserialize)]
#[serde(default)]
struct RawAdjustments {
    brightness: f64,
    contrast: f64,
    saturation: f64,
}

impl Default for RawAdjustments {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

impl From<RawAdjustments> for Adjustments {
    fn from(raw: RawAdjustments) -> Self {
        // `as` saturates and maps NaN to 0
        Adjustments::new(
            raw.brightness.round() as i32,
            raw.contrast.round() as i32,
            raw.saturation.round() as i32,
        )
    }
}

/// Which slider an adjustment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentKind {
    Brightness,
    Contrast,
    Saturation,
}

impl FromStr for AdjustmentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "brightness" => Ok(AdjustmentKind::Brightness),
            "contrast" => Ok(AdjustmentKind::Contrast),
            "saturation" | "saturate" => Ok(AdjustmentKind::Saturation),
            other => Err(format!(
                "unknown adjustment '{other}'. Expected brightness, contrast, or saturation"
            )),
        }
    }
}
