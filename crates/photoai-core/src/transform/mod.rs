//! Geometry operations: rotation and cropping.
//!
//! Both operations change the canvas, so they are the points where the
//! pipeline re-rasterizes. Color adjustments are re-applied afterwards from
//! the un-adjusted result, never stacked on an already adjusted buffer.
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen,
//!   normalized to `[0, 360)`
//! - Crop rectangles are percentages (0 to 100) of the image they are
//!   applied to
//! - Origin is top-left corner

mod crop;
mod rotation;

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::raster::RasterBuffer;

pub use crop::{crop, crop_rotated, CropRect, PixelRect};
pub use rotation::{compute_rotated_bounds, normalize_degrees, rotate, InterpolationFilter};

/// One recorded geometry step.
///
/// The edit session keeps these in order so the same geometry can be
/// replayed onto a background-removal result that arrives later.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum GeometryOp {
    Crop { rect: CropRect },
    Rotate { degrees: f64 },
}

impl GeometryOp {
    /// Apply this step to `source`.
    pub fn apply(
        &self,
        source: &RasterBuffer,
        filter: InterpolationFilter,
    ) -> Result<RasterBuffer, EditError> {
        match self {
            GeometryOp::Crop { rect } => crop(source, rect),
            GeometryOp::Rotate { degrees } => rotate(source, *degrees, filter),
        }
    }
}

/// Apply `ops` in order.
pub fn replay(
    source: &RasterBuffer,
    ops: &[GeometryOp],
    filter: InterpolationFilter,
) -> Result<RasterBuffer, EditError> {
    ops.iter()
        .try_fold(source.clone(), |image, op| op.apply(&image, filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_applies_in_order() {
        let img = RasterBuffer::filled(100, 50, [10, 20, 30, 255]);
        let ops = [
            GeometryOp::Rotate { degrees: 90.0 },
            GeometryOp::Crop {
                rect: CropRect::new(0.0, 0.0, 100.0, 25.0),
            },
        ];
        let result = replay(&img, &ops, InterpolationFilter::Bilinear).unwrap();
        // 100x50 -> 50x100 -> top quarter 50x25
        assert_eq!(result.dimensions(), (50, 25));
    }

    #[test]
    fn test_replay_of_nothing_is_identity() {
        let img = RasterBuffer::filled(3, 3, [1, 2, 3, 4]);
        let result = replay(&img, &[], InterpolationFilter::Bilinear).unwrap();
        assert!(result.shares_pixels_with(&img));
    }

    #[test]
    fn test_replay_stops_at_first_error() {
        let empty = RasterBuffer::new(0, 0, vec![]).unwrap();
        let ops = [GeometryOp::Rotate { degrees: 10.0 }];
        assert!(replay(&empty, &ops, InterpolationFilter::Bilinear).is_err());
    }
}
