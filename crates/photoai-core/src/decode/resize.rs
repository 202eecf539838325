//! Aspect-preserving resizes used at ingestion.
//!
//! All functions return new buffers without modifying the input.

use super::FilterType;
use crate::error::EditError;
use crate::raster::RasterBuffer;

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if the source or the target size
/// has zero area.
pub fn resize(
    image: &RasterBuffer,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterBuffer, EditError> {
    image.ensure_non_empty("resize")?;
    if width == 0 || height == 0 {
        return Err(EditError::InvalidBuffer(format!(
            "cannot resize to {width}x{height}"
        )));
    }

    if image.dimensions() == (width, height) {
        return Ok(image.clone());
    }

    let resized = image::imageops::resize(
        &image.to_rgba_image(),
        width,
        height,
        filter.to_image_filter(),
    );
    Ok(RasterBuffer::from_rgba_image(resized))
}

/// Shrink an image so its longest edge is at most `max_edge`.
///
/// Images that already fit, and a `max_edge` of zero, return the input
/// unchanged. Images are never upscaled.
pub fn resize_to_fit(image: &RasterBuffer, max_edge: u32, filter: FilterType) -> RasterBuffer {
    let (src_width, src_height) = image.dimensions();
    if max_edge == 0 || image.is_empty() || (src_width <= max_edge && src_height <= max_edge) {
        return image.clone();
    }

    let (new_width, new_height) = calculate_fit_dimensions(src_width, src_height, max_edge);
    let resized = image::imageops::resize(
        &image.to_rgba_image(),
        new_width,
        new_height,
        filter.to_image_filter(),
    );
    tracing::debug!(
        from_width = src_width,
        from_height = src_height,
        to_width = new_width,
        to_height = new_height,
        "downscaled oversized image"
    );
    RasterBuffer::from_rgba_image(resized)
}

/// Calculate dimensions to fit within max_edge while preserving aspect ratio.
fn calculate_fit_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (0, 0);
    }

    let ratio = width as f64 / height as f64;

    if width >= height {
        let new_height = (max_edge as f64 / ratio).round() as u32;
        (max_edge, new_height.max(1))
    } else {
        let new_width = (max_edge as f64 * ratio).round() as u32;
        (new_width.max(1), max_edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_image(width: u32, height: u32) -> RasterBuffer {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(255);
            }
        }
        RasterBuffer::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_resize_basic() {
        let img = gradient_image(100, 50);
        let resized = resize(&img, 50, 25, FilterType::Bilinear).unwrap();
        assert_eq!(resized.dimensions(), (50, 25));
        assert_eq!(resized.pixels().len(), 50 * 25 * 4);
    }

    #[test]
    fn test_resize_same_dimensions_shares_pixels() {
        let img = gradient_image(10, 5);
        let resized = resize(&img, 10, 5, FilterType::Lanczos3).unwrap();
        assert!(resized.shares_pixels_with(&img));
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = gradient_image(100, 50);
        assert!(resize(&img, 0, 50, FilterType::Bilinear).is_err());
        assert!(resize(&img, 50, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_to_fit_landscape() {
        let img = gradient_image(600, 400);
        let resized = resize_to_fit(&img, 256, FilterType::Bilinear);
        assert_eq!(resized.dimensions(), (256, 171));
    }

    #[test]
    fn test_resize_to_fit_portrait() {
        let img = gradient_image(400, 600);
        let resized = resize_to_fit(&img, 256, FilterType::Bilinear);
        assert_eq!(resized.dimensions(), (171, 256));
    }

    #[test]
    fn test_resize_to_fit_never_upscales() {
        let img = gradient_image(100, 50);
        assert_eq!(resize_to_fit(&img, 256, FilterType::Bilinear).dimensions(), (100, 50));
        assert_eq!(resize_to_fit(&img, 0, FilterType::Bilinear).dimensions(), (100, 50));
    }

    #[test]
    fn test_resize_preserves_alpha() {
        let img = RasterBuffer::filled(8, 8, [10, 20, 30, 0]);
        let resized = resize(&img, 4, 4, FilterType::Bilinear).unwrap();
        assert!(resized.pixels().chunks_exact(4).all(|p| p[3] == 0));
    }

    #[test]
    fn test_calculate_fit_dimensions() {
        assert_eq!(calculate_fit_dimensions(6000, 4000, 2560), (2560, 1707));
        assert_eq!(calculate_fit_dimensions(4000, 6000, 2560), (1707, 2560));
        assert_eq!(calculate_fit_dimensions(4000, 4000, 256), (256, 256));
        assert_eq!(calculate_fit_dimensions(0, 0, 256), (0, 0));
    }
}
