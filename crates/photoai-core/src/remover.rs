//! Seam to the external background segmentation service.
//!
//! The service is a black box: it takes a decoded image and either returns
//! the same image with background pixels made transparent, or fails as a
//! whole. There are no partial results.

use std::future::Future;

use thiserror::Error;

use crate::raster::RasterBuffer;

/// Failure of a background removal call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The service could not be reached or is not loaded.
    #[error("Background removal service unavailable: {0}")]
    Unavailable(String),

    /// The service ran and reported an error.
    #[error("Background removal failed: {0}")]
    Failed(String),

    /// The service returned an image that does not match its input.
    #[error(
        "Background removal returned a {}x{} image for a {}x{} input",
        actual.0, actual.1, expected.0, expected.1
    )]
    InvalidOutput {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// An asynchronous background segmentation service.
///
/// The returned future is not required to be `Send`; in the browser the
/// call resolves on the single JS thread.
pub trait BackgroundRemover {
    /// Return `image` with background pixels made transparent.
    fn remove_background(
        &self,
        image: &RasterBuffer,
    ) -> impl Future<Output = Result<RasterBuffer, ServiceError>>;
}

impl<T: BackgroundRemover + ?Sized> BackgroundRemover for &T {
    fn remove_background(
        &self,
        image: &RasterBuffer,
    ) -> impl Future<Output = Result<RasterBuffer, ServiceError>> {
        (**self).remove_background(image)
    }
}

/// Check that a service result lines up pixel for pixel with its input.
pub fn validate_output(input: &RasterBuffer, output: &RasterBuffer) -> Result<(), ServiceError> {
    if input.dimensions() != output.dimensions() {
        return Err(ServiceError::InvalidOutput {
            expected: input.dimensions(),
            actual: output.dimensions(),
        });
    }
    Ok(())
}
