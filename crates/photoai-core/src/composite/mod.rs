//! Background compositing for cut-out foregrounds.
//!
//! A background is either a two-stop gradient or an image. It is rendered
//! at the foreground's size and the foreground is drawn over it with
//! source-over alpha blending. Where the foreground is opaque it wins;
//! where it is transparent the background shows through.

mod cover;
mod gradient;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::color::GradientStops;
use crate::decode::FilterType;
use crate::error::EditError;
use crate::palette;
use crate::raster::{RasterBuffer, CHANNELS};

pub use cover::{cover_window, fill_cover};
pub use gradient::{fill_gradient, GRADIENT_ANGLE_DEGREES};

/// What to draw behind the foreground.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundSpec {
    /// Linear gradient at 135°, start stop in the top-left corner.
    Gradient(GradientStops),
    /// Image scaled to cover the canvas, centered.
    Image(RasterBuffer),
}

impl BackgroundSpec {
    /// Gradient background from one of the built-in presets.
    pub fn preset(name: &str) -> Option<Self> {
        palette::gradient_preset(name).map(|preset| BackgroundSpec::Gradient(preset.stops))
    }

    /// Short label for logging.
    pub fn kind(&self) -> BackgroundKind {
        match self {
            BackgroundSpec::Gradient(_) => BackgroundKind::Gradient,
            BackgroundSpec::Image(_) => BackgroundKind::Image,
        }
    }

    /// Render this background onto a `width x height` canvas.
    pub fn render(
        &self,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<RasterBuffer, EditError> {
        match self {
            BackgroundSpec::Gradient(stops) => {
                Ok(fill_gradient(width, height, stops, GRADIENT_ANGLE_DEGREES))
            }
            BackgroundSpec::Image(image) => fill_cover(image, width, height, filter),
        }
    }
}

/// Serializable discriminant of [`BackgroundSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Gradient,
    Image,
}

/// Draw `foreground` over `background`.
///
/// The output has the foreground's dimensions. `filter` is used only when
/// an image background has to be resized.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if the foreground or an image
/// background has zero area.
pub fn composite(
    foreground: &RasterBuffer,
    background: &BackgroundSpec,
    filter: FilterType,
) -> Result<RasterBuffer, EditError> {
    foreground.ensure_non_empty("composite")?;
    let (width, height) = foreground.dimensions();

    let canvas = background.render(width, height, filter)?;
    debug!(width, height, kind = ?background.kind(), "compositing over background");

    let mut output = Vec::with_capacity(foreground.pixels().len());
    for (fg, bg) in foreground
        .pixels()
        .chunks_exact(CHANNELS)
        .zip(canvas.pixels().chunks_exact(CHANNELS))
    {
        output.extend_from_slice(&source_over(fg, bg));
    }

    Ok(RasterBuffer::from_raw(width, height, output))
}

/// Porter-Duff source-over for straight-alpha RGBA.
#[inline]
fn source_over(fg: &[u8], bg: &[u8]) -> [u8; 4] {
    match fg[3] {
        u8::MAX => return [fg[0], fg[1], fg[2], fg[3]],
        0 => return [bg[0], bg[1], bg[2], bg[3]],
        _ => {}
    }

    let fa = fg[3] as f32 / 255.0;
    let ba = bg[3] as f32 / 255.0;
    let out_a = fa + ba * (1.0 - fa);
    let blend = |f: u8, b: u8| {
        let c = (f as f32 * fa + b as f32 * ba * (1.0 - fa)) / out_a;
        c.clamp(0.0, 255.0).round() as u8
    };

    [
        blend(fg[0], bg[0]),
        blend(fg[1], bg[1]),
        blend(fg[2], bg[2]),
        (out_a * 255.0).round() as u8,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    /// Left column opaque red, right column fully transparent.
    fn half_cutout() -> RasterBuffer {
        RasterBuffer::new(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap()
    }

    fn solid(color: Color) -> BackgroundSpec {
        BackgroundSpec::Gradient(GradientStops::new(color, color))
    }

    #[test]
    fn test_opaque_foreground_wins() {
        let result = composite(
            &half_cutout(),
            &solid(Color::rgb(0, 0, 255)),
            FilterType::Bilinear,
        )
        .unwrap();
        assert_eq!(result.pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_transparent_foreground_shows_background() {
        let result = composite(
            &half_cutout(),
            &solid(Color::rgb(0, 0, 255)),
            FilterType::Bilinear,
        )
        .unwrap();
        assert_eq!(result.pixel(1, 0), [0, 0, 255, 255]);
        assert!(result.is_opaque());
    }

    #[test]
    fn test_half_alpha_blends_evenly() {
        let fg = RasterBuffer::filled(1, 1, [255, 255, 255, 128]);
        let result = composite(&fg, &solid(Color::rgb(0, 0, 0)), FilterType::Bilinear).unwrap();
        let [r, g, b, a] = result.pixel(0, 0);
        assert_eq!(a, 255);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert!((r as i32 - 128).abs() <= 1, "got {r}");
    }

    #[test]
    fn test_over_transparent_background_keeps_foreground() {
        let fg = RasterBuffer::filled(1, 1, [200, 100, 50, 100]);
        let result = composite(&fg, &solid(Color::TRANSPARENT), FilterType::Bilinear).unwrap();
        assert_eq!(result.pixel(0, 0), [200, 100, 50, 100]);
    }

    #[test]
    fn test_output_matches_foreground_size() {
        let fg = RasterBuffer::filled(40, 30, [0, 0, 0, 0]);
        let bg = BackgroundSpec::Image(RasterBuffer::filled(300, 100, [9, 9, 9, 255]));
        let result = composite(&fg, &bg, FilterType::Bilinear).unwrap();
        assert_eq!(result.dimensions(), (40, 30));
        assert_eq!(result.pixel(20, 15), [9, 9, 9, 255]);
    }

    #[test]
    fn test_preset_lookup() {
        let spec = BackgroundSpec::preset("Ocean").unwrap();
        assert_eq!(spec.kind(), BackgroundKind::Gradient);
        assert!(BackgroundSpec::preset("nope").is_none());
    }

    #[test]
    fn test_empty_foreground_is_rejected() {
        let fg = RasterBuffer::new(0, 5, vec![]).unwrap();
        let err = composite(&fg, &solid(Color::WHITE), FilterType::Bilinear).unwrap_err();
        assert!(matches!(err, EditError::InvalidBuffer(_)));
    }
}
