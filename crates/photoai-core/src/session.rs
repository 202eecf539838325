//! The edit session: the state machine behind one editing surface.
//!
//! A session owns the immutable `original`, the layers derived from it and
//! the displayed `current` buffer. Every operation builds its new layers off
//! to the side and commits them in one assignment, so a failed operation
//! leaves the session exactly as it was.
//!
//! Rendering is layered:
//!
//! ```text
//! original --geometry--> base
//! cut-out  --geometry--> removed
//! unadjusted = composite(removed, background) | removed | base
//! current    = adjust(unadjusted)
//! ```
//!
//! Adjustments are always recomputed from `unadjusted`, so moving a slider
//! back to 100 restores the exact pixels instead of compounding filters.
//!
//! # Background removal
//!
//! Removal is the only operation that waits on an external service. It is
//! split into [`EditSession::begin_background_removal`], which hands out a
//! [`RemovalTicket`] tagged with the session's generation, and
//! [`EditSession::finish_background_removal`], which applies the result only
//! if no newer removal or reset happened in between. The service always
//! sees the original image; the recorded geometry is replayed onto its
//! result so it lines up with the current canvas.

use tracing::{debug, warn};

use crate::adjustments::apply_adjustments;
use crate::composite::{composite, BackgroundSpec};
use crate::config::EditorConfig;
use crate::decode::{decode_image, FilterType};
use crate::encode::{encode, ExportFormat};
use crate::error::EditError;
use crate::raster::RasterBuffer;
use crate::remover::{validate_output, BackgroundRemover, ServiceError};
use crate::transform::{replay, CropRect, GeometryOp};
use crate::{AdjustmentKind, Adjustments};

/// Precondition message for compositing before a removal result exists.
pub const REMOVAL_REQUIRED: &str = "background removal required first";

/// Handle for one outstanding background removal call.
#[derive(Debug)]
pub struct RemovalTicket {
    generation: u64,
    source: RasterBuffer,
}

impl RemovalTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The image to send to the removal service.
    pub fn source(&self) -> &RasterBuffer {
        &self.source
    }
}

/// What happened to a finished removal call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    /// The result became the session's cut-out.
    Applied,
    /// A newer removal or a reset superseded the call; the result was dropped.
    Stale,
}

/// Un-adjusted layers of a session.
#[derive(Debug, Clone)]
struct Layers {
    /// `original` with the geometry history applied.
    base: RasterBuffer,
    /// Removal result with the geometry history applied.
    removed: Option<RasterBuffer>,
    /// Active replacement background.
    background: Option<BackgroundSpec>,
}

impl Layers {
    fn from_original(original: &RasterBuffer) -> Self {
        Self {
            base: original.clone(),
            removed: None,
            background: None,
        }
    }

    fn flatten(&self, filter: FilterType) -> Result<RasterBuffer, EditError> {
        match (&self.removed, &self.background) {
            (Some(foreground), Some(background)) => composite(foreground, background, filter),
            (Some(foreground), None) => Ok(foreground.clone()),
            (None, _) => Ok(self.base.clone()),
        }
    }
}

/// One loaded image and the edits applied to it.
#[derive(Debug)]
pub struct EditSession {
    config: EditorConfig,
    original: RasterBuffer,
    geometry: Vec<GeometryOp>,
    layers: Layers,
    unadjusted: RasterBuffer,
    adjustments: Adjustments,
    current: RasterBuffer,
    generation: u64,
}

impl EditSession {
    /// Decode `bytes` and open a session on the result.
    pub fn load(bytes: &[u8], config: EditorConfig) -> Result<Self, EditError> {
        let original = decode_image(bytes, &config.decode)?;
        Self::from_buffer(original, config)
    }

    /// Open a session on an already decoded image.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::InvalidBuffer`] if `original` has zero area.
    pub fn from_buffer(original: RasterBuffer, config: EditorConfig) -> Result<Self, EditError> {
        original.ensure_non_empty("edit session")?;
        debug!(
            width = original.width(),
            height = original.height(),
            "session loaded"
        );
        Ok(Self {
            config,
            geometry: Vec::new(),
            layers: Layers::from_original(&original),
            unadjusted: original.clone(),
            adjustments: Adjustments::IDENTITY,
            current: original.clone(),
            original,
            generation: 0,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The decoded input. Never changes for the life of the session.
    pub fn original(&self) -> &RasterBuffer {
        &self.original
    }

    /// The buffer to display and export.
    pub fn current(&self) -> &RasterBuffer {
        &self.current
    }

    /// The cut-out foreground, aligned with the current geometry.
    pub fn background_removed(&self) -> Option<&RasterBuffer> {
        self.layers.removed.as_ref()
    }

    pub fn background(&self) -> Option<&BackgroundSpec> {
        self.layers.background.as_ref()
    }

    pub fn adjustments(&self) -> Adjustments {
        self.adjustments
    }

    /// Geometry applied since load or the last reset, oldest first.
    pub fn geometry(&self) -> &[GeometryOp] {
        &self.geometry
    }

    /// Counter used to reject stale removal results.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Set one slider and recompute `current` from the un-adjusted layer.
    ///
    /// Values outside `[0, 200]` are clamped.
    pub fn set_adjustment(
        &mut self,
        kind: AdjustmentKind,
        value: i32,
    ) -> Result<&RasterBuffer, EditError> {
        self.set_adjustments(self.adjustments.with(kind, value))
    }

    /// Replace all three sliders at once.
    pub fn set_adjustments(
        &mut self,
        adjustments: Adjustments,
    ) -> Result<&RasterBuffer, EditError> {
        let adjustments = adjustments.clamped();
        let current = apply_adjustments(&self.unadjusted, &adjustments)?;
        debug!(
            brightness = adjustments.brightness,
            contrast = adjustments.contrast,
            saturation = adjustments.saturation,
            "adjustments changed"
        );
        self.adjustments = adjustments;
        self.current = current;
        Ok(&self.current)
    }

    /// Crop to a rectangle given in percent of the current canvas.
    pub fn crop(&mut self, rect: CropRect) -> Result<&RasterBuffer, EditError> {
        self.apply_geometry(&[GeometryOp::Crop {
            rect: rect.clamped(),
        }])
    }

    /// Rotate clockwise by `degrees`, growing the canvas to fit.
    pub fn rotate(&mut self, degrees: f64) -> Result<&RasterBuffer, EditError> {
        self.apply_geometry(&[GeometryOp::Rotate { degrees }])
    }

    /// Rotate, then crop against the rotated canvas, as a single edit.
    pub fn crop_rotated(
        &mut self,
        rect: CropRect,
        degrees: f64,
    ) -> Result<&RasterBuffer, EditError> {
        self.apply_geometry(&[
            GeometryOp::Rotate { degrees },
            GeometryOp::Crop {
                rect: rect.clamped(),
            },
        ])
    }

    fn apply_geometry(&mut self, ops: &[GeometryOp]) -> Result<&RasterBuffer, EditError> {
        let filter = self.config.interpolation;
        let layers = Layers {
            base: replay(&self.layers.base, ops, filter)?,
            removed: self
                .layers
                .removed
                .as_ref()
                .map(|removed| replay(removed, ops, filter))
                .transpose()?,
            background: self.layers.background.clone(),
        };
        self.commit(layers)?;
        self.geometry.extend_from_slice(ops);
        debug!(
            ?ops,
            width = self.current.width(),
            height = self.current.height(),
            "geometry applied"
        );
        Ok(&self.current)
    }

    /// Start a background removal call.
    ///
    /// Any ticket handed out earlier becomes stale.
    pub fn begin_background_removal(&mut self) -> RemovalTicket {
        self.generation += 1;
        debug!(generation = self.generation, "background removal started");
        RemovalTicket {
            generation: self.generation,
            source: self.original.clone(),
        }
    }

    /// Apply the outcome of the call `ticket` was issued for.
    ///
    /// A stale ticket is dropped with [`RemovalOutcome::Stale`] whatever the
    /// result was. On success the cut-out replaces any earlier one, the
    /// active background is cleared and `current` shows the cut-out with the
    /// current adjustments.
    ///
    /// # Errors
    ///
    /// - [`EditError::Service`] if the service failed or returned an image
    ///   whose size does not match its input
    /// - [`EditError::InvalidBuffer`] if replaying geometry onto the result fails
    pub fn finish_background_removal(
        &mut self,
        ticket: RemovalTicket,
        result: Result<RasterBuffer, ServiceError>,
    ) -> Result<RemovalOutcome, EditError> {
        if ticket.generation != self.generation {
            warn!(
                ticket = ticket.generation,
                generation = self.generation,
                "discarding stale background removal result"
            );
            return Ok(RemovalOutcome::Stale);
        }

        let cutout = result
            .and_then(|cutout| validate_output(&ticket.source, &cutout).map(|()| cutout))
            .inspect_err(|err| warn!(%err, "background removal failed"))?;

        let layers = Layers {
            base: self.layers.base.clone(),
            removed: Some(replay(&cutout, &self.geometry, self.config.interpolation)?),
            background: None,
        };
        self.commit(layers)?;
        debug!(generation = self.generation, "background removal applied");
        Ok(RemovalOutcome::Applied)
    }

    /// Run a full removal call against `remover`.
    pub async fn remove_background<R>(&mut self, remover: &R) -> Result<RemovalOutcome, EditError>
    where
        R: BackgroundRemover + ?Sized,
    {
        let ticket = self.begin_background_removal();
        let result = remover.remove_background(ticket.source()).await;
        self.finish_background_removal(ticket, result)
    }

    /// Composite the cut-out over `background`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::PreconditionFailed`] if no removal result exists.
    pub fn add_background(
        &mut self,
        background: BackgroundSpec,
    ) -> Result<&RasterBuffer, EditError> {
        if self.layers.removed.is_none() {
            return Err(EditError::PreconditionFailed(REMOVAL_REQUIRED));
        }
        let kind = background.kind();
        let layers = Layers {
            background: Some(background),
            ..self.layers.clone()
        };
        self.commit(layers)?;
        debug!(?kind, "background replaced");
        Ok(&self.current)
    }

    /// Drop the replacement background, keeping the cut-out.
    pub fn clear_background(&mut self) -> Result<&RasterBuffer, EditError> {
        if self.layers.background.is_some() {
            let layers = Layers {
                background: None,
                ..self.layers.clone()
            };
            self.commit(layers)?;
            debug!("background cleared");
        }
        Ok(&self.current)
    }

    /// Return to the original image.
    ///
    /// Clears the cut-out, the background and all geometry, resets the
    /// sliders to identity and invalidates any outstanding removal call.
    pub fn reset(&mut self) -> &RasterBuffer {
        self.generation += 1;
        self.geometry.clear();
        self.layers = Layers::from_original(&self.original);
        self.unadjusted = self.original.clone();
        self.adjustments = Adjustments::IDENTITY;
        self.current = self.original.clone();
        debug!(generation = self.generation, "session reset");
        &self.current
    }

    /// Encode `current` in the configured export format.
    pub fn export(&self) -> Result<Vec<u8>, EditError> {
        self.export_as(self.config.export)
    }

    /// Encode `current` in `format`.
    pub fn export_as(&self, format: ExportFormat) -> Result<Vec<u8>, EditError> {
        let bytes = encode(&self.current, format)?;
        debug!(?format, bytes = bytes.len(), "exported");
        Ok(bytes)
    }

    /// End the session, releasing every buffer it holds.
    pub fn close(self) {
        debug!(generation = self.generation, "session closed");
    }

    /// Rebuild the un-adjusted and current buffers from `layers`, then
    /// commit everything together.
    fn commit(&mut self, layers: Layers) -> Result<(), EditError> {
        let unadjusted = layers.flatten(self.config.background_filter)?;
        let current = apply_adjustments(&unadjusted, &self.adjustments)?;
        self.layers = layers;
        self.unadjusted = unadjusted;
        self.current = current;
        Ok(())
    }
}
