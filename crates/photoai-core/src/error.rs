//! Error taxonomy for the edit pipeline.
//!
//! Each concern keeps its own error enum next to its code ([`DecodeError`],
//! [`EncodeError`], [`ServiceError`]); [`EditError`] is what the pipeline and
//! the edit session report to callers.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::remover::ServiceError;

/// Errors reported by pipeline operations and [`crate::EditSession`].
///
/// A failed operation never changes session state.
#[derive(Debug, Error)]
pub enum EditError {
    /// Zero-area or malformed raster.
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),

    /// Operation invoked before the step it depends on.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(&'static str),

    /// The background removal service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The input image could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The current image could not be encoded for export.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl EditError {
    /// True for errors the user can fix by re-running the same action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EditError::Service(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_display() {
        let err = EditError::PreconditionFailed("background removal required first");
        assert_eq!(
            err.to_string(),
            "Precondition failed: background removal required first"
        );
    }

    #[test]
    fn test_wrapped_errors_are_transparent() {
        let err: EditError = DecodeError::InvalidFormat.into();
        assert_eq!(err.to_string(), "Invalid or unsupported image format");
        assert!(!err.is_retryable());

        let err: EditError = ServiceError::Failed("model crashed".into()).into();
        assert!(err.is_retryable());
    }
}
