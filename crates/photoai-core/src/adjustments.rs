//! Color adjustment: brightness, contrast and saturation.
//!
//! ## Adjustment Order
//! 1. Brightness (multiplicative, 100 = identity)
//! 2. Contrast (pivot around mid-gray 128)
//! 3. Saturation (blend between luminance and original chroma)
//!
//! All three run in a single pass and each stage clamps to `[0, 255]`, the
//! same composition a `brightness() contrast() saturate()` filter chain has.
//! Brightness and contrast are per-channel, so they are folded into one
//! 256-entry table computed once per call.

use crate::error::EditError;
use crate::luminance::calculate_luminance;
use crate::raster::{RasterBuffer, CHANNELS};
use crate::Adjustments;

/// Contrast pivot.
const MID_GRAY: f32 = 128.0;

/// Apply adjustments to `source`, returning a new buffer of the same size.
///
/// Out-of-range values are clamped to `[0, 200]` before use. Alpha is
/// copied unchanged. The identity setting (100, 100, 100) returns a
/// pixel-identical buffer.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if `source` has zero area.
pub fn apply_adjustments(
    source: &RasterBuffer,
    adjustments: &Adjustments,
) -> Result<RasterBuffer, EditError> {
    source.ensure_non_empty("color adjustment")?;

    let adjustments = adjustments.clamped();
    // Early exit if no adjustments
    if adjustments.is_identity() {
        return Ok(source.clone());
    }

    let tone = ToneTable::new(adjustments.brightness, adjustments.contrast);
    let saturation = adjustments.saturation as f32 / 100.0;

    let mut output = Vec::with_capacity(source.pixels().len());
    for px in source.pixels().chunks_exact(CHANNELS) {
        let r = tone.get(px[0]);
        let g = tone.get(px[1]);
        let b = tone.get(px[2]);
        let (r, g, b) = apply_saturation(r, g, b, saturation);

        output.push(to_channel(r));
        output.push(to_channel(g));
        output.push(to_channel(b));
        output.push(px[3]);
    }

    Ok(RasterBuffer::from_raw(
        source.width(),
        source.height(),
        output,
    ))
}

/// Brightness followed by contrast for every possible channel value.
struct ToneTable {
    values: [f32; 256],
}

impl ToneTable {
    fn new(brightness: u8, contrast: u8) -> Self {
        let brightness = brightness as f32 / 100.0;
        let contrast = contrast as f32 / 100.0;
        let mut values = [0.0f32; 256];
        for (i, value) in values.iter_mut().enumerate() {
            let v = apply_brightness(i as f32, brightness);
            *value = apply_contrast(v, contrast);
        }
        Self { values }
    }

    #[inline]
    fn get(&self, channel: u8) -> f32 {
        self.values[channel as usize]
    }
}

/// Formula: `output = input * factor`
#[inline]
fn apply_brightness(v: f32, factor: f32) -> f32 {
    (v * factor).clamp(0.0, 255.0)
}

/// Formula: `output = (input - 128) * factor + 128`
#[inline]
fn apply_contrast(v: f32, factor: f32) -> f32 {
    ((v - MID_GRAY) * factor + MID_GRAY).clamp(0.0, 255.0)
}

/// Factor 0 is grayscale, 1 is unchanged, above 1 pushes channels away from
/// the pixel's luminance.
#[inline]
fn apply_saturation(r: f32, g: f32, b: f32, factor: f32) -> (f32, f32, f32) {
    if factor == 1.0 {
        return (r, g, b);
    }
    let gray = calculate_luminance(r, g, b);
    (
        (gray + (r - gray) * factor).clamp(0.0, 255.0),
        (gray + (g - gray) * factor).clamp(0.0, 255.0),
        (gray + (b - gray) * factor).clamp(0.0, 255.0),
    )
}

#[inline]
fn to_channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}
