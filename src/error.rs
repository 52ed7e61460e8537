//! Error types for map generation.
//!
//! Only configuration problems and internal-consistency faults are errors.
//! Degenerate but valid outcomes (few seeds, no surviving regions, no good
//! settlement site) are logged and carried in the output instead.

use crate::regions::RegionId;

/// Errors raised by the generation pipeline and its exporters.
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    /// Configuration rejected before any generation work starts.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The region map references a region that has no record.
    #[error("region map references region {id} but only {regions} regions exist")]
    InconsistentRegionMap {
        /// The dangling id.
        id: RegionId,
        /// Number of region records at the time of the check.
        regions: usize,
    },

    /// Refinement was requested before the island was partitioned.
    #[error("regions must be partitioned before they can be refined")]
    StageOrder,

    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenError>;
