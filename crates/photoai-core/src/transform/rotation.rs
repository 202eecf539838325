//! Image rotation with bilinear and Lanczos3 interpolation.
//!
//! Quarter turns (90°, 180°, 270°) are exact pixel permutations done with
//! `image::imageops`. Every other angle uses inverse mapping: for each pixel
//! in the output image we find the source position that lands on it and
//! interpolate there.
//!
//! For a clockwise rotation by θ in screen space (y grows downward), the
//! inverse transform is:
//! ```text
//! src_x =  (dst_x - dst_cx) * cos(θ) + (dst_y - dst_cy) * sin(θ) + src_cx
//! src_y = -(dst_x - dst_cx) * sin(θ) + (dst_y - dst_cy) * cos(θ) + src_cy
//! ```
//!
//! Samples outside the source are transparent and interpolation runs on
//! premultiplied alpha, so the uncovered corners of the grown canvas stay
//! transparent and the rotated edges are antialiased.

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::raster::{RasterBuffer, CHANNELS};

/// Angles closer than this to a quarter turn snap to it.
const ANGLE_EPSILON: f64 = 0.001;

/// Interpolation filter for rotation operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationFilter {
    /// Fast bilinear interpolation.
    #[default]
    Bilinear,
    /// Sharper Lanczos3 interpolation, slower.
    Lanczos3,
}

/// Normalize an angle in degrees to `[0, 360)`.
///
/// Non-finite input is treated as no rotation.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    if normalized >= 360.0 - ANGLE_EPSILON {
        0.0
    } else {
        normalized
    }
}

/// Exact rotations that need no resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuarterTurn {
    None,
    Cw90,
    Half,
    Cw270,
}

impl QuarterTurn {
    fn from_degrees(normalized: f64) -> Option<Self> {
        [
            (0.0, QuarterTurn::None),
            (90.0, QuarterTurn::Cw90),
            (180.0, QuarterTurn::Half),
            (270.0, QuarterTurn::Cw270),
        ]
        .into_iter()
        .find(|(angle, _)| (normalized - angle).abs() < ANGLE_EPSILON)
        .map(|(_, turn)| turn)
    }
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Returns
///
/// Tuple of (new_width, new_height). 90° and 270° swap the dimensions
/// exactly; other angles round the rotated bounding box and never return
/// zero.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let normalized = normalize_degrees(angle_degrees);
    match QuarterTurn::from_degrees(normalized) {
        Some(QuarterTurn::None) | Some(QuarterTurn::Half) => return (width, height),
        Some(QuarterTurn::Cw90) | Some(QuarterTurn::Cw270) => return (height, width),
        None => {}
    }

    let angle_rad = normalized.to_radians();
    let cos = angle_rad.cos().abs();
    let sin = angle_rad.sin().abs();

    let w = width as f64;
    let h = height as f64;

    // new_w = |w*cos| + |h*sin|
    // new_h = |w*sin| + |h*cos|
    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image clockwise around its center.
///
/// `degrees` is normalized to `[0, 360)` first. The output canvas grows to
/// the rotated bounding box, so nothing is clipped; corners the source does
/// not cover are transparent.
///
/// # Errors
///
/// Returns [`EditError::InvalidBuffer`] if `source` has zero area.
pub fn rotate(
    source: &RasterBuffer,
    degrees: f64,
    filter: InterpolationFilter,
) -> Result<RasterBuffer, EditError> {
    source.ensure_non_empty("rotate")?;

    let normalized = normalize_degrees(degrees);
    if let Some(turn) = QuarterTurn::from_degrees(normalized) {
        return Ok(rotate_quarter(source, turn));
    }

    let (src_w, src_h) = (source.width() as f64, source.height() as f64);
    let (dst_w, dst_h) = compute_rotated_bounds(source.width(), source.height(), normalized);

    let angle_rad = normalized.to_radians();
    let cos = angle_rad.cos();
    let sin = angle_rad.sin();

    // Centers in continuous coordinates; pixel (i, j) covers [i, i+1).
    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = Vec::with_capacity(dst_w as usize * dst_h as usize * CHANNELS);

    for dst_y in 0..dst_h {
        for dst_x in 0..dst_w {
            let dx = dst_x as f64 + 0.5 - dst_cx;
            let dy = dst_y as f64 + 0.5 - dst_cy;

            // Back to pixel-index space of the source (centers at +0.5).
            let src_x = dx * cos + dy * sin + src_cx - 0.5;
            let src_y = -dx * sin + dy * cos + src_cy - 0.5;

            let pixel = match filter {
                InterpolationFilter::Bilinear => sample_bilinear(source, src_x, src_y),
                InterpolationFilter::Lanczos3 => sample_lanczos3(source, src_x, src_y),
            };
            output.extend_from_slice(&pixel);
        }
    }

    Ok(RasterBuffer::from_raw(dst_w, dst_h, output))
}

fn rotate_quarter(source: &RasterBuffer, turn: QuarterTurn) -> RasterBuffer {
    match turn {
        QuarterTurn::None => source.clone(),
        QuarterTurn::Cw90 => {
            RasterBuffer::from_rgba_image(image::imageops::rotate90(&source.to_rgba_image()))
        }
        QuarterTurn::Half => {
            RasterBuffer::from_rgba_image(image::imageops::rotate180(&source.to_rgba_image()))
        }
        QuarterTurn::Cw270 => {
            RasterBuffer::from_rgba_image(image::imageops::rotate270(&source.to_rgba_image()))
        }
    }
}

/// Fetch a pixel as premultiplied `[r*a, g*a, b*a, a]` with `a` in 0-1.
/// Out-of-bounds positions are transparent.
#[inline]
fn premultiplied(image: &RasterBuffer, px: i64, py: i64) -> [f64; 4] {
    if px < 0 || py < 0 || px >= image.width() as i64 || py >= image.height() as i64 {
        return [0.0; 4];
    }
    let p = image.pixel(px as u32, py as u32);
    let a = p[3] as f64 / 255.0;
    [p[0] as f64 * a, p[1] as f64 * a, p[2] as f64 * a, a]
}

/// Turn an accumulated premultiplied sample back into straight RGBA8.
#[inline]
fn unpremultiply(sum: [f64; 4]) -> [u8; 4] {
    let a = sum[3].clamp(0.0, 1.0);
    if a <= f64::EPSILON {
        return [0, 0, 0, 0];
    }
    [
        (sum[0] / a).clamp(0.0, 255.0).round() as u8,
        (sum[1] / a).clamp(0.0, 255.0).round() as u8,
        (sum[2] / a).clamp(0.0, 255.0).round() as u8,
        (a * 255.0).round() as u8,
    ]
}

/// Sample a pixel using bilinear interpolation over the 4 nearest pixels.
fn sample_bilinear(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    // Entirely outside the 1px transparent apron
    if x <= -1.0 || y <= -1.0 || x >= image.width() as f64 || y >= image.height() as f64 {
        return [0, 0, 0, 0];
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = premultiplied(image, x0, y0);
    let p10 = premultiplied(image, x0 + 1, y0);
    let p01 = premultiplied(image, x0, y0 + 1);
    let p11 = premultiplied(image, x0 + 1, y0 + 1);

    let mut sum = [0.0f64; 4];
    for i in 0..4 {
        sum[i] = p00[i] * (1.0 - fx) * (1.0 - fy)
            + p10[i] * fx * (1.0 - fy)
            + p01[i] * (1.0 - fx) * fy
            + p11[i] * fx * fy;
    }
    unpremultiply(sum)
}

/// Sample a pixel using Lanczos3 interpolation over a 6x6 neighborhood.
fn sample_lanczos3(image: &RasterBuffer, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width() as i64, image.height() as i64);

    // Fall back to bilinear where the kernel would leave the image
    if x < 2.0 || x >= (w - 3) as f64 || y < 2.0 || y >= (h - 3) as f64 {
        return sample_bilinear(image, x, y);
    }

    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;

    let mut sum = [0.0f64; 4];
    let mut weight_sum = 0.0;

    for ky in -2..=3 {
        for kx in -2..=3 {
            let px = x0 + kx;
            let py = y0 + ky;
            let weight = lanczos_weight(x - px as f64, 3.0) * lanczos_weight(y - py as f64, 3.0);
            let p = premultiplied(image, px, py);
            for i in 0..4 {
                sum[i] += p[i] * weight;
            }
            weight_sum += weight;
        }
    }

    if weight_sum.abs() <= f64::EPSILON {
        return [0, 0, 0, 0];
    }
    for v in &mut sum {
        *v /= weight_sum;
    }
    unpremultiply(sum)
}

/// Lanczos kernel weight function.
///
/// ```text
/// L(x) = sinc(x) * sinc(x/a)  for |x| < a
/// L(x) = 0                     for |x| >= a
/// ```
fn lanczos_weight(x: f64, a: f64) -> f64 {
    if x.abs() < f64::EPSILON {
        return 1.0;
    }
    if x.abs() >= a {
        return 0.0;
    }

    let pi_x = std::f64::consts::PI * x;
    let pi_x_a = pi_x / a;

    (a * pi_x.sin() * pi_x_a.sin()) / (pi_x * pi_x)
}
