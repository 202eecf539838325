//! Editor configuration.
//!
//! Every field has a default, so a shell can pass `{}` or only the keys it
//! cares about.

use serde::{Deserialize, Serialize};

use crate::decode::{DecodeOptions, FilterType};
use crate::encode::ExportFormat;
use crate::transform::InterpolationFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Resampling filter for free-angle rotation.
    pub interpolation: InterpolationFilter,
    /// Resize filter for cover-fitting image backgrounds.
    pub background_filter: FilterType,
    /// Ingestion options.
    pub decode: DecodeOptions,
    /// Format used by `export()` when none is given.
    pub export: ExportFormat,
}
