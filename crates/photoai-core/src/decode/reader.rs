//! Image ingestion with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};

use super::resize::resize_to_fit;
use super::{DecodeError, DecodeOptions, Orientation};
use crate::raster::RasterBuffer;

/// Container formats the editor accepts.
pub const SUPPORTED_FORMATS: [ImageFormat; 5] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
    ImageFormat::WebP,
];

/// Decode PNG, JPEG, GIF, BMP or WebP bytes into an RGBA buffer.
///
/// The container is detected from the content, not from a file name. EXIF
/// orientation is applied unless disabled in `options`, and the result is
/// downscaled when `options.max_edge` is set. Animated GIFs yield their
/// first frame.
///
/// # Errors
///
/// - [`DecodeError::InvalidFormat`] if the bytes are not a known image container
/// - [`DecodeError::UnsupportedFormat`] for known containers outside the supported set
/// - [`DecodeError::CorruptedFile`] if decoding fails part way
/// - [`DecodeError::EmptyImage`] if the image has zero width or height
#[tracing::instrument(skip_all, fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8], options: &DecodeOptions) -> Result<RasterBuffer, DecodeError> {
    let format = detect_format(bytes)?;

    let orientation = if options.apply_orientation {
        extract_orientation(bytes)
    } else {
        Orientation::Normal
    };

    let mut reader = ImageReader::new(Cursor::new(bytes));
    reader.set_format(format);
    let img = reader.decode().map_err(map_image_error)?;

    let (width, height) = if orientation.swaps_dimensions() {
        (img.height(), img.width())
    } else {
        (img.width(), img.height())
    };
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage);
    }
    tracing::debug!(?format, ?orientation, width, height, "decoded image");

    let rgba = apply_orientation(img, orientation).into_rgba8();

    let buffer = RasterBuffer::from_rgba_image(rgba);
    Ok(match options.max_edge {
        Some(max_edge) => resize_to_fit(&buffer, max_edge, options.resize_filter),
        None => buffer,
    })
}

/// Guess the container from magic bytes and check it is accepted.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::InvalidFormat)?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(DecodeError::UnsupportedFormat(format!("{format:?}")));
    }
    Ok(format)
}

/// EXIF orientation of `bytes`, `Normal` when absent or unreadable.
fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

fn map_image_error(err: ImageError) -> DecodeError {
    match err {
        ImageError::Unsupported(e) => DecodeError::UnsupportedFormat(e.to_string()),
        ImageError::Limits(_) => DecodeError::OutOfMemory,
        other => DecodeError::CorruptedFile(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FilterType;

    fn sample_rgba(width: u32, height: u32) -> image::RgbaImage {
        image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([(x * 40) as u8, (y * 40) as u8, 90, 255])
        })
    }

    fn encode_as(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_each_supported_format() {
        let rgba = DynamicImage::ImageRgba8(sample_rgba(5, 3));
        let cases = [
            (ImageFormat::Png, rgba.clone()),
            (ImageFormat::Jpeg, DynamicImage::ImageRgb8(rgba.to_rgb8())),
            (ImageFormat::Gif, rgba.clone()),
            (ImageFormat::Bmp, rgba.clone()),
            (ImageFormat::WebP, rgba.clone()),
        ];

        for (format, img) in cases {
            let bytes = encode_as(img, format);
            let decoded = decode_image(&bytes, &DecodeOptions::default())
                .unwrap_or_else(|e| panic!("{format:?} failed: {e}"));
            assert_eq!(decoded.dimensions(), (5, 3), "{format:?}");
        }
    }

    #[test]
    fn test_png_is_lossless() {
        let src = sample_rgba(4, 4);
        let bytes = encode_as(DynamicImage::ImageRgba8(src.clone()), ImageFormat::Png);
        let decoded = decode_image(&bytes, &DecodeOptions::default()).unwrap();
        assert_eq!(decoded.pixels(), src.as_raw().as_slice());
    }

    #[test]
    fn test_garbage_is_invalid_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03], &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
        assert!(matches!(
            decode_image(&[], &DecodeOptions::default()),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_known_but_unsupported_container() {
        // Little-endian TIFF header
        let tiff = [0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00];
        let result = decode_image(&tiff, &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_truncated_file_is_corrupted() {
        let bytes = encode_as(DynamicImage::ImageRgba8(sample_rgba(16, 16)), ImageFormat::Png);
        let result = decode_image(&bytes[..bytes.len() / 2], &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_max_edge_downscales() {
        let bytes = encode_as(DynamicImage::ImageRgba8(sample_rgba(6, 4)), ImageFormat::Png);
        let options = DecodeOptions {
            max_edge: Some(3),
            resize_filter: FilterType::Bilinear,
            ..Default::default()
        };
        let decoded = decode_image(&bytes, &options).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
    }

    #[test]
    fn test_orientation_without_exif() {
        let bytes = encode_as(DynamicImage::ImageRgba8(sample_rgba(2, 2)), ImageFormat::Png);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_predicted_dimensions_match_applied_orientation() {
        for value in 1..=8 {
            let orientation = Orientation::from(value);
            let img = DynamicImage::ImageRgba8(sample_rgba(3, 2));
            let out = apply_orientation(img, orientation);
            let expected = if orientation.swaps_dimensions() { (2, 3) } else { (3, 2) };
            assert_eq!((out.width(), out.height()), expected, "{orientation:?}");
        }
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        // 2x1: red left, green right
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::Rotate90CW)
            .into_rgba8();

        assert_eq!(result.dimensions(), (1, 2));
        // Clockwise: the left pixel ends up on top
        assert_eq!(result.get_pixel(0, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let img = image::RgbaImage::from_raw(2, 1, vec![255, 0, 0, 255, 0, 255, 0, 255]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgba8(img), Orientation::FlipHorizontal)
            .into_rgba8();

        assert_eq!(result.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(result.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
