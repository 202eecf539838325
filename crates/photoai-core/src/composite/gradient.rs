//! Linear gradient fill matching a CSS `linear-gradient(135deg, a, b)`.
//!
//! A CSS angle points from the start to the end of the gradient line, with
//! 0° pointing up and angles growing clockwise, so 135° runs from the
//! top-left corner to the bottom-right. The gradient line is sized so that
//! the two stops land exactly on those corners:
//!
//! ```text
//! length = |w * sin θ| + |h * cos θ|
//! t      = ((px, py) - center) · (sin θ, -cos θ) / length + 0.5
//! ```

use crate::color::GradientStops;
use crate::raster::{RasterBuffer, CHANNELS};

/// Gradient angle used by every background preset.
pub const GRADIENT_ANGLE_DEGREES: f64 = 135.0;

/// Paint a `width x height` canvas with a linear gradient at `angle_degrees`.
pub fn fill_gradient(
    width: u32,
    height: u32,
    stops: &GradientStops,
    angle_degrees: f64,
) -> RasterBuffer {
    let angle = angle_degrees.to_radians();
    let (dir_x, dir_y) = (angle.sin(), -angle.cos());

    let w = width as f64;
    let h = height as f64;
    let length = (w * dir_x).abs() + (h * dir_y).abs();
    let (cx, cy) = (w / 2.0, h / 2.0);

    let mut output = Vec::with_capacity(width as usize * height as usize * CHANNELS);
    for y in 0..height {
        for x in 0..width {
            let px = x as f64 + 0.5 - cx;
            let py = y as f64 + 0.5 - cy;
            let t = if length > f64::EPSILON {
                (px * dir_x + py * dir_y) / length + 0.5
            } else {
                0.5
            };
            output.extend_from_slice(&stops.start.lerp(stops.end, t as f32));
        }
    }

    RasterBuffer::from_raw(width, height, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    fn black_to_white() -> GradientStops {
        GradientStops::new(Color::rgb(0, 0, 0), Color::WHITE)
    }

    #[test]
    fn test_corners_approach_stops() {
        let img = fill_gradient(200, 100, &black_to_white(), GRADIENT_ANGLE_DEGREES);
        assert!(img.pixel(0, 0)[0] < 4, "top-left should be the start stop");
        assert!(img.pixel(199, 99)[0] > 251, "bottom-right should be the end stop");
    }

    #[test]
    fn test_anti_diagonal_is_midpoint() {
        let img = fill_gradient(100, 100, &black_to_white(), GRADIENT_ANGLE_DEGREES);
        // The other two corners sit on the 50% line of a square canvas.
        let top_right = img.pixel(99, 0)[0] as i32;
        let bottom_left = img.pixel(0, 99)[0] as i32;
        assert!((top_right - 128).abs() <= 2, "got {top_right}");
        assert_eq!(top_right, bottom_left);
    }

    #[test]
    fn test_monotonic_along_diagonal() {
        let img = fill_gradient(64, 64, &black_to_white(), GRADIENT_ANGLE_DEGREES);
        let mut prev = 0;
        for i in 0..64 {
            let v = img.pixel(i, i)[0];
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_gradient_is_opaque_for_opaque_stops() {
        let img = fill_gradient(17, 9, &black_to_white(), GRADIENT_ANGLE_DEGREES);
        assert!(img.is_opaque());
        assert_eq!(img.dimensions(), (17, 9));
    }

    #[test]
    fn test_vertical_gradient() {
        // 180deg runs top to bottom: every row is uniform.
        let img = fill_gradient(10, 10, &black_to_white(), 180.0);
        assert_eq!(img.pixel(0, 3), img.pixel(9, 3));
        assert!(img.pixel(0, 0)[0] < img.pixel(0, 9)[0]);
    }
}
