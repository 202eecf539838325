//! "Cover" fit of a background image onto a canvas.
//!
//! The image is scaled by `max(canvas_w / img_w, canvas_h / img_h)`, so it
//! fills the canvas on both axes while keeping its aspect ratio, then
//! centered. Overflow on the longer axis is cropped; the canvas is never
//! letterboxed.

use image::imageops;

use crate::decode::FilterType;
use crate::error::EditError;
use crate::raster::RasterBuffer;

/// Source window `(x, y, w, h)` of a `src` image that stays visible when it
/// is cover-fitted onto a `dst` canvas.
///
/// Only this window is ever resampled, so the work scales with the canvas
/// and not with how far the background's aspect ratio is off.
pub fn cover_window(src: (u32, u32), dst: (u32, u32)) -> (u32, u32, u32, u32) {
    let (sw, sh) = (f64::from(src.0), f64::from(src.1));
    let scale = (f64::from(dst.0) / sw).max(f64::from(dst.1) / sh);
    let w = ((f64::from(dst.0) / scale).round() as u32).clamp(1, src.0.max(1));
    let h = ((f64::from(dst.1) / scale).round() as u32).clamp(1, src.1.max(1));
    (src.0.saturating_sub(w) / 2, src.1.saturating_sub(h) / 2, w, h)
}

/// Render `background` cover-fitted onto a `width x height` canvas.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if `background` has zero area.
pub fn fill_cover(
    background: &RasterBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterBuffer, EditError> {
    background.ensure_non_empty("background image")?;

    let (x, y, w, h) = cover_window(background.dimensions(), (width, height));
    let source = background.to_rgba_image();
    let visible = imageops::crop_imm(&source, x, y, w, h).to_image();
    if (w, h) == (width, height) {
        return Ok(RasterBuffer::from_rgba_image(visible));
    }

    let scaled = imageops::resize(&visible, width, height, filter.to_image_filter());
    Ok(RasterBuffer::from_rgba_image(scaled))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Left half red, right half blue.
    fn split_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..height {
            for x in 0..width {
                if x < width / 2 {
                    pixels.extend_from_slice(&[255, 0, 0, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 255, 255]);
                }
            }
        }
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_cover_window() {
        // Wider than canvas: height fits, the middle columns stay visible
        assert_eq!(cover_window((200, 100), (100, 100)), (50, 0, 100, 100));
        // Smaller image scales up from its central square
        assert_eq!(cover_window((10, 20), (100, 100)), (0, 5, 10, 10));
        // Same aspect ratio uses the whole image
        assert_eq!(cover_window((1920, 1080), (640, 360)), (0, 0, 1920, 1080));
    }

    #[test]
    fn test_extreme_aspect_ratio_samples_only_the_visible_window() {
        // A 1000x10 strip behind a square canvas keeps a 10x10 window
        assert_eq!(cover_window((1000, 10), (1000, 1000)), (495, 0, 10, 10));

        let bg = split_image(1000, 10);
        let result = fill_cover(&bg, 100, 100, FilterType::Bilinear).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
        // Window spans columns 495..505, straddling the red/blue seam.
        assert_eq!(result.pixel(0, 50), [255, 0, 0, 255]);
        assert_eq!(result.pixel(99, 50), [0, 0, 255, 255]);
        assert!(result.is_opaque());
    }

    #[test]
    fn test_overflow_is_cropped_from_the_center() {
        let bg = split_image(200, 100);
        let result = fill_cover(&bg, 100, 100, FilterType::Bilinear).unwrap();

        assert_eq!(result.dimensions(), (100, 100));
        // Visible columns are 50..150 of the source: red then blue.
        assert_eq!(result.pixel(0, 50), [255, 0, 0, 255]);
        assert_eq!(result.pixel(49, 50), [255, 0, 0, 255]);
        assert_eq!(result.pixel(50, 50), [0, 0, 255, 255]);
        assert_eq!(result.pixel(99, 50), [0, 0, 255, 255]);
    }

    #[test]
    fn test_upscaled_background_covers_canvas() {
        let bg = RasterBuffer::filled(10, 20, [0, 200, 0, 255]);
        let result = fill_cover(&bg, 100, 100, FilterType::Bilinear).unwrap();
        assert_eq!(result.dimensions(), (100, 100));
        assert!(result.is_opaque(), "cover fit must not letterbox");
    }

    #[test]
    fn test_empty_background_is_rejected() {
        let bg = RasterBuffer::new(0, 0, vec![]).unwrap();
        assert!(fill_cover(&bg, 10, 10, FilterType::Bilinear).is_err());
    }
}
