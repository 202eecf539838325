//! The RGBA raster buffer every pipeline stage reads from and writes to.
//!
//! A [`RasterBuffer`] is immutable once built. Pixel storage sits behind an
//! `Arc<[u8]>`, so cloning a buffer hands out another read-only reference to
//! the same pixels instead of copying them. Every operation in this crate
//! returns a new buffer rather than editing one in place.

use std::sync::Arc;

use crate::error::EditError;

/// Bytes per RGBA pixel.
pub const CHANNELS: usize = 4;

/// A decoded image with RGBA8 pixel data in row-major order.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl RasterBuffer {
    /// Create a buffer from dimensions and RGBA pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidBuffer`] if `pixels.len()` is not
    /// `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditError> {
        let expected = byte_len(width, height);
        if pixels.len() != expected {
            return Err(EditError::InvalidBuffer(format!(
                "expected {expected} bytes for {width}x{height} RGBA, got {}",
                pixels.len()
            )));
        }
        Ok(Self::from_raw(width, height, pixels))
    }

    /// Create a buffer filled with a single RGBA value.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            pixels.extend_from_slice(&rgba);
        }
        Self::from_raw(width, height, pixels)
    }

    /// Internal constructor for pipeline stages that size their output themselves.
    pub(crate) fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            byte_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, img.into_raw())
    }

    /// Copy into an `image::RgbaImage` for use with `image::imageops`.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            image::Rgba(self.pixel(x, y))
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// RGBA bytes, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read one pixel. Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this buffer has zero area.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when every pixel is fully opaque.
    pub fn is_opaque(&self) -> bool {
        self.pixels.chunks_exact(CHANNELS).all(|p| p[3] == u8::MAX)
    }

    /// Whether two buffers share the same pixel storage.
    pub fn shares_pixels_with(&self, other: &RasterBuffer) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Fail with `InvalidBuffer` for a zero-area buffer.
    pub(crate) fn ensure_non_empty(&self, operation: &str) -> Result<(), EditError> {
        if self.is_empty() {
            return Err(EditError::InvalidBuffer(format!(
                "{operation} requires a non-empty image, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

#[inline]
fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
